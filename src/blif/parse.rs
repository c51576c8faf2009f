// SPDX-License-Identifier: Apache-2.0

//! Reader for the combinational subset of BLIF.
//!
//! Supported: `.model`, `.inputs`, `.outputs`, `.names` with single-output
//! covers and `.end`. Every `.names` becomes one LUT named after the net it
//! drives. Definitions may appear in any order; LUTs are created in a
//! fan-in-first order that otherwise follows the file.

use std::collections::HashMap;

use crate::klut::{KlutNetwork, KlutRef};
use crate::truth_table::TruthTable;

/// Largest `.names` fan-in accepted.
pub const MAX_LUT_INPUTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub msg: String,
    pub line: usize,
    pub col: usize,
}

impl ParseError {
    fn new(msg: String, line: usize, col: usize) -> Self {
        Self { msg, line, col }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ParseError: {} at line {}, column {}",
            self.msg, self.line, self.col
        )
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    col: usize,
}

/// A line after comment stripping and continuation joining.
struct LogicalLine<'a> {
    line: usize,
    tokens: Vec<Token<'a>>,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    text: &text[s..i],
                    col: s + 1,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            text: &text[s..],
            col: s + 1,
        });
    }
    tokens
}

fn logical_lines(text: &str) -> Vec<LogicalLine<'_>> {
    let mut lines = Vec::new();
    let mut pending: Option<LogicalLine<'_>> = None;
    for (i, raw) in text.lines().enumerate() {
        let without_comment = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let trimmed = without_comment.trim_end();
        let (body, continues) = match trimmed.strip_suffix('\\') {
            Some(body) => (body, true),
            None => (trimmed, false),
        };
        let tokens = tokenize(body);
        let current = match pending.take() {
            Some(mut line) => {
                line.tokens.extend(tokens);
                line
            }
            None => LogicalLine {
                line: i + 1,
                tokens,
            },
        };
        if continues {
            pending = Some(current);
        } else if !current.tokens.is_empty() {
            lines.push(current);
        }
    }
    if let Some(line) = pending {
        if !line.tokens.is_empty() {
            lines.push(line);
        }
    }
    lines
}

struct NamesDef {
    inputs: Vec<String>,
    output: String,
    cubes: Vec<(String, char)>,
    line: usize,
    col: usize,
}

impl NamesDef {
    fn function(&self) -> Result<TruthTable, ParseError> {
        let n = self.inputs.len();
        let on_set = match self.cubes.first() {
            None => return Ok(TruthTable::const0(n)),
            Some((_, value)) => *value == '1',
        };
        if self.cubes.iter().any(|(_, v)| (*v == '1') != on_set) {
            return Err(ParseError::new(
                format!(
                    "cover for '{}' mixes on-set and off-set cubes",
                    self.output
                ),
                self.line,
                self.col,
            ));
        }
        let cubes: Vec<&[u8]> = self.cubes.iter().map(|(c, _)| c.as_bytes()).collect();
        let covered = TruthTable::from_fn(n, |m| {
            cubes.iter().any(|cube| {
                cube.iter().enumerate().all(|(i, lit)| match lit {
                    b'0' => (m >> i) & 1 == 0,
                    b'1' => (m >> i) & 1 == 1,
                    _ => true,
                })
            })
        });
        Ok(if on_set { covered } else { covered.not() })
    }
}

struct Parsed {
    model: Option<String>,
    inputs: Vec<(String, usize, usize)>,
    outputs: Vec<(String, usize, usize)>,
    defs: Vec<NamesDef>,
}

fn parse_lines(lines: &[LogicalLine<'_>]) -> Result<Parsed, ParseError> {
    let mut parsed = Parsed {
        model: None,
        inputs: Vec::new(),
        outputs: Vec::new(),
        defs: Vec::new(),
    };
    let mut in_names = false;
    for line in lines {
        let head = line.tokens[0];
        if !head.text.starts_with('.') {
            if !in_names {
                return Err(ParseError::new(
                    format!("unexpected '{}' outside of a .names cover", head.text),
                    line.line,
                    head.col,
                ));
            }
            let def = parsed.defs.last_mut().ok_or_else(|| {
                ParseError::new("cube without .names".to_string(), line.line, head.col)
            })?;
            def.cubes.push(parse_cube(line, def.inputs.len())?);
            continue;
        }
        in_names = false;
        let args = &line.tokens[1..];
        match head.text {
            ".model" => {
                if parsed.model.is_some() {
                    return Err(ParseError::new(
                        "multiple .model sections are not supported".to_string(),
                        line.line,
                        head.col,
                    ));
                }
                parsed.model = Some(
                    args.first()
                        .map(|t| t.text.to_string())
                        .unwrap_or_else(|| "top".to_string()),
                );
            }
            ".inputs" => parsed
                .inputs
                .extend(args.iter().map(|t| (t.text.to_string(), line.line, t.col))),
            ".outputs" => parsed
                .outputs
                .extend(args.iter().map(|t| (t.text.to_string(), line.line, t.col))),
            ".names" => {
                let Some((output, inputs)) = args.split_last() else {
                    return Err(ParseError::new(
                        ".names needs at least an output net".to_string(),
                        line.line,
                        head.col,
                    ));
                };
                if inputs.len() > MAX_LUT_INPUTS {
                    return Err(ParseError::new(
                        format!(
                            ".names for '{}' has {} inputs; at most {} are supported",
                            output.text,
                            inputs.len(),
                            MAX_LUT_INPUTS
                        ),
                        line.line,
                        head.col,
                    ));
                }
                parsed.defs.push(NamesDef {
                    inputs: inputs.iter().map(|t| t.text.to_string()).collect(),
                    output: output.text.to_string(),
                    cubes: Vec::new(),
                    line: line.line,
                    col: output.col,
                });
                in_names = true;
            }
            ".end" => break,
            other => {
                return Err(ParseError::new(
                    format!("unsupported directive '{}'", other),
                    line.line,
                    head.col,
                ))
            }
        }
    }
    Ok(parsed)
}

fn parse_cube(line: &LogicalLine<'_>, num_inputs: usize) -> Result<(String, char), ParseError> {
    let (pattern, value) = match (num_inputs, line.tokens.as_slice()) {
        (0, [value]) => ("", *value),
        (n, [pattern, value]) if n > 0 => (pattern.text, *value),
        _ => {
            return Err(ParseError::new(
                format!("malformed cube for a {}-input cover", num_inputs),
                line.line,
                line.tokens[0].col,
            ))
        }
    };
    if pattern.len() != num_inputs || !pattern.bytes().all(|b| matches!(b, b'0' | b'1' | b'-')) {
        return Err(ParseError::new(
            format!("malformed input pattern '{}'", pattern),
            line.line,
            line.tokens[0].col,
        ));
    }
    let out = match value.text {
        "0" => '0',
        "1" => '1',
        other => {
            return Err(ParseError::new(
                format!("cube output must be 0 or 1, got '{}'", other),
                line.line,
                value.col,
            ))
        }
    };
    Ok((pattern.to_string(), out))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

pub fn parse_blif(text: &str) -> Result<KlutNetwork, ParseError> {
    let lines = logical_lines(text);
    let parsed = parse_lines(&lines)?;
    let model = parsed.model.as_deref().unwrap_or("top");
    let mut ntk = KlutNetwork::new(model);

    let mut nets: HashMap<String, KlutRef> = HashMap::new();
    for (name, line, col) in &parsed.inputs {
        if nets.contains_key(name) {
            return Err(ParseError::new(
                format!("input '{}' declared twice", name),
                *line,
                *col,
            ));
        }
        let node = ntk.add_input(Some(name.clone()));
        nets.insert(name.clone(), node);
    }

    let mut def_of: HashMap<&str, usize> = HashMap::new();
    for (i, def) in parsed.defs.iter().enumerate() {
        if nets.contains_key(&def.output) || def_of.insert(def.output.as_str(), i).is_some() {
            return Err(ParseError::new(
                format!("net '{}' is defined more than once", def.output),
                def.line,
                def.col,
            ));
        }
    }

    let mut state = vec![Visit::New; parsed.defs.len()];
    for root in 0..parsed.defs.len() {
        if state[root] != Visit::New {
            continue;
        }
        state[root] = Visit::Active;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(top) = stack.last_mut() {
            let current = top.0;
            let def = &parsed.defs[current];
            if top.1 < def.inputs.len() {
                let fanin = def.inputs[top.1].as_str();
                top.1 += 1;
                if nets.contains_key(fanin) {
                    continue;
                }
                let Some(&child) = def_of.get(fanin) else {
                    return Err(ParseError::new(
                        format!("net '{}' used by '{}' is never defined", fanin, def.output),
                        def.line,
                        def.col,
                    ));
                };
                match state[child] {
                    Visit::Done => {}
                    Visit::Active => {
                        return Err(ParseError::new(
                            format!("combinational cycle through '{}'", fanin),
                            def.line,
                            def.col,
                        ))
                    }
                    Visit::New => {
                        state[child] = Visit::Active;
                        stack.push((child, 0));
                    }
                }
                continue;
            }
            let fanins: Vec<KlutRef> = def.inputs.iter().map(|n| nets[n.as_str()]).collect();
            let node = ntk.add_lut(fanins, def.function()?);
            ntk.set_name(node, def.output.clone());
            nets.insert(def.output.clone(), node);
            state[current] = Visit::Done;
            stack.pop();
        }
    }

    for (name, line, col) in &parsed.outputs {
        let Some(&node) = nets.get(name) else {
            return Err(ParseError::new(
                format!("output '{}' is never defined", name),
                *line,
                *col,
            ));
        };
        ntk.add_output(node, name.clone());
    }

    log::debug!(
        "parse_blif: model={} inputs={} outputs={} luts={}",
        model,
        ntk.num_inputs(),
        ntk.num_outputs(),
        ntk.num_luts()
    );
    Ok(ntk)
}
