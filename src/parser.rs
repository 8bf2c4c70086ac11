use crate::ast::{
    Attribute, ApertureDefinition, ApertureMacro, ApertureTemplate, CoordinateFormat,
    CoordinateMode, InterpolationMode, Mirroring, Node, Operation, OperationKind, Polarity,
    SelectAperture, StepRepeat, Unit, ZeroOmission,
};
use crate::document::GerberDoc;
use crate::tokenizer::{tokenize, Token, TokenKind};
use lazy_regex::*;
use regex::Regex;

// Regex terms for the fixed-shape extended blocks. Coordinate words in
// operation commands are scanned byte-by-byte instead (see `parse_operation`),
// which is both faster and more tolerant of partial input.
static RE_FORMAT_SPEC: Lazy<Regex> = lazy_regex!(r"^FS([LT])([AI])X([0-9])([0-9])Y([0-9])([0-9])$");

/// `ADD<code><template>[,<params>]`, params separated by `X`
static RE_APERTURE: Lazy<Regex> = lazy_regex!(r"^ADD([0-9]+)([._$a-zA-Z][._$a-zA-Z0-9]{0,126})(?:,\s?(.*))?$");

static RE_STEP_REPEAT: Lazy<Regex> =
    lazy_regex!(r"^SR(?:X([0-9]+))?(?:Y([0-9]+))?(?:I([0-9]+\.?[0-9]*))?(?:J([0-9]+\.?[0-9]*))?$");

/// Parse a complete Gerber source into a document.
///
/// Parsing never fails: commands the grammar does not recognize, and input
/// that ends mid-block, are preserved as [`Node::Unknown`] so the document
/// still round-trips byte-for-byte. Malformed aperture definitions are the
/// one place the parser guesses, substituting a default circle so that
/// partially broken files still preview.
pub fn parse(source: &str) -> GerberDoc {
    let mut doc = GerberDoc::new();
    for token in tokenize(source) {
        let node = parse_token(&token);
        match &node {
            Node::Unknown(raw) => {
                log::warn!("line {}: preserving unrecognized command: {}", token.line, raw.trim())
            }
            node => log::debug!("line {}: {:?}", token.line, node),
        }
        doc.push_node(node);
    }
    doc
}

fn parse_token(token: &Token) -> Node {
    if !token.terminated {
        // Stray input at end of file, kept as-is.
        return match token.kind {
            TokenKind::ExtendedBlock => Node::Unknown(format!("%{}", token.value)),
            TokenKind::Command => Node::Unknown(token.value.clone()),
        };
    }
    match token.kind {
        TokenKind::ExtendedBlock => parse_extended_block(&token.value),
        TokenKind::Command => parse_command(&token.value),
    }
}

/// Dispatch an extended block on its two-letter prefix; first match wins.
fn parse_extended_block(value: &str) -> Node {
    let body = value.strip_suffix('*').unwrap_or(value);

    if let Some(rest) = body.strip_prefix("FS") {
        parse_format_spec(rest).unwrap_or_else(|| unknown_block(value))
    } else if let Some(rest) = body.strip_prefix("MO") {
        match rest {
            "MM" => Node::UnitMode(Unit::Millimeters),
            "IN" => Node::UnitMode(Unit::Inches),
            _ => unknown_block(value),
        }
    } else if body.starts_with("AD") {
        Node::ApertureDefinition(parse_aperture_definition(body))
    } else if let Some(rest) = body.strip_prefix("AM") {
        // name runs up to the first inner star, the remainder is the raw body
        match rest.split_once('*') {
            Some((name, macro_body)) => Node::ApertureMacro(ApertureMacro {
                name: name.trim().to_string(),
                body: macro_body.to_string(),
            }),
            None => Node::ApertureMacro(ApertureMacro {
                name: rest.trim().to_string(),
                body: String::new(),
            }),
        }
    } else if let Some(rest) = body.strip_prefix("LP") {
        match rest {
            "D" => Node::LoadPolarity(Polarity::Dark),
            "C" => Node::LoadPolarity(Polarity::Clear),
            _ => unknown_block(value),
        }
    } else if let Some(rest) = body.strip_prefix("LM") {
        match rest {
            "N" => Node::LoadMirroring(Mirroring::None),
            "X" => Node::LoadMirroring(Mirroring::X),
            "Y" => Node::LoadMirroring(Mirroring::Y),
            "XY" => Node::LoadMirroring(Mirroring::XY),
            _ => unknown_block(value),
        }
    } else if let Some(rest) = body.strip_prefix("LR") {
        match rest.trim().parse::<f64>() {
            Ok(angle) => Node::LoadRotation(angle),
            Err(_) => unknown_block(value),
        }
    } else if let Some(rest) = body.strip_prefix("LS") {
        match rest.trim().parse::<f64>() {
            Ok(factor) => Node::LoadScaling(factor),
            Err(_) => unknown_block(value),
        }
    } else if body.starts_with("SR") {
        parse_step_repeat(body).unwrap_or_else(|| unknown_block(value))
    } else if let Some(rest) = body.strip_prefix("TF.") {
        Node::FileAttribute(parse_attribute(rest))
    } else if let Some(rest) = body.strip_prefix("TA.") {
        Node::ApertureAttribute(parse_attribute(rest))
    } else if let Some(rest) = body.strip_prefix("TO.") {
        Node::ObjectAttribute(parse_attribute(rest))
    } else if let Some(rest) = body.strip_prefix("TD") {
        match rest.strip_prefix('.') {
            Some(name) => Node::DeleteAttribute(Some(name.to_string())),
            None if rest.is_empty() => Node::DeleteAttribute(None),
            None => unknown_block(value),
        }
    } else if let Some(rest) = body.strip_prefix("IP") {
        Node::ImagePolarity(rest.to_string())
    } else if let Some(rest) = body.strip_prefix("OF") {
        Node::ImageOffset(rest.to_string())
    } else {
        unknown_block(value)
    }
}

fn unknown_block(value: &str) -> Node {
    Node::Unknown(format!("%{}%", value))
}

fn parse_format_spec(rest: &str) -> Option<Node> {
    let captures = RE_FORMAT_SPEC.captures(rest)?;
    let zero_omission = match &captures[1] {
        "L" => ZeroOmission::Leading,
        _ => ZeroOmission::Trailing,
    };
    let mode = match &captures[2] {
        "A" => CoordinateMode::Absolute,
        _ => CoordinateMode::Incremental,
    };
    let digit = |index: usize| captures[index].parse::<u8>().ok();
    Some(Node::FormatSpecification(CoordinateFormat::new(
        zero_omission,
        mode,
        digit(3)?,
        digit(4)?,
        digit(5)?,
        digit(6)?,
    )))
}

/// Parse `ADD<code><template>[,<params>]`. A definition that does not match
/// the pattern yields the default circle with code 10, rather than an error,
/// so malformed files still produce a previewable document.
fn parse_aperture_definition(body: &str) -> ApertureDefinition {
    let Some(captures) = RE_APERTURE.captures(body) else {
        log::warn!("malformed aperture definition '{}', substituting defaults", body);
        return ApertureDefinition {
            code: 10,
            template: ApertureTemplate::Circle,
            params: Vec::new(),
        };
    };

    let code = captures[1].parse::<i32>().unwrap_or(10);
    let template = ApertureTemplate::from_name(&captures[2]);
    let params = captures
        .get(3)
        .map(|m| {
            m.as_str()
                .split('X')
                .filter_map(|param| {
                    let param = param.trim();
                    if param.is_empty() {
                        return None;
                    }
                    match param.parse::<f64>() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            log::warn!("skipping unparseable aperture parameter '{}'", param);
                            None
                        }
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    ApertureDefinition {
        code,
        template,
        params,
    }
}

fn parse_step_repeat(body: &str) -> Option<Node> {
    let captures = RE_STEP_REPEAT.captures(body)?;
    let count = |index: usize| -> Option<u32> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };
    let step = |index: usize| -> Option<f64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0.0),
        }
    };
    Some(Node::StepRepeat(StepRepeat {
        x_count: count(1)?,
        y_count: count(2)?,
        i_step: step(3)?,
        j_step: step(4)?,
    }))
}

/// Split `<name>[,<value>...]` on commas; the head is the attribute name.
fn parse_attribute(rest: &str) -> Attribute {
    let mut fields = rest.split(',').map(str::trim);
    let name = fields.next().unwrap_or_default().to_string();
    Attribute::new(name, fields.map(str::to_string).collect())
}

/// Dispatch a word command. Mode-setting G-codes, comments, region brackets
/// and end-of-file are matched exactly; everything carrying a terminal
/// D01/D02/D03 goes through the operation scanner; `D<code>` selects an
/// aperture. The rest is preserved as unknown.
fn parse_command(value: &str) -> Node {
    let cmd = value.trim();

    if let Some(text) = cmd.strip_prefix("G04") {
        return Node::Comment(text.trim().to_string());
    }

    match cmd {
        "G36" => return Node::RegionStart,
        "G37" => return Node::RegionEnd,
        "G74" => return Node::InterpolationMode(InterpolationMode::SingleQuadrant),
        "G75" => return Node::InterpolationMode(InterpolationMode::MultiQuadrant),
        "G01" | "G1" => return Node::InterpolationMode(InterpolationMode::Linear),
        "G02" | "G2" => return Node::InterpolationMode(InterpolationMode::ClockwiseCircular),
        "G03" | "G3" => {
            return Node::InterpolationMode(InterpolationMode::CounterclockwiseCircular)
        }
        "M00" | "M0" | "M02" | "M2" => return Node::EndOfFile,
        _ => {}
    }

    if let Some(node) = parse_operation(cmd) {
        return node;
    }

    if let Some(code_str) = cmd.strip_prefix('D') {
        if let Ok(code) = code_str.parse::<i32>() {
            if let Ok(select) = SelectAperture::new(code) {
                return Node::SelectAperture(select);
            }
        }
    }

    Node::Unknown(format!("{}*", value))
}

/// Byte-by-byte scan of an operation command: an optional leading G01/G02/G03,
/// coordinate words (a letter from XYIJ, an optional sign, digits), and a
/// terminal D01/D02/D03. A coordinate whose digits fail to parse is treated
/// as absent; anything outside this shape is not an operation.
fn parse_operation(cmd: &str) -> Option<Node> {
    let bytes = cmd.as_bytes();
    let mut index = 0;

    let mut x = None;
    let mut y = None;
    let mut i = None;
    let mut j = None;
    let mut interpolation = None;
    let mut kind = None;

    while index < bytes.len() {
        if bytes[index].is_ascii_whitespace() {
            index += 1;
            continue;
        }
        let letter = bytes[index] as char;
        index += 1;

        let start = index;
        if index < bytes.len() && (bytes[index] == b'+' || bytes[index] == b'-') {
            index += 1;
        }
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
        let number = &cmd[start..index];

        match letter {
            'G' => {
                interpolation = Some(match number.parse::<u32>() {
                    Ok(1) => InterpolationMode::Linear,
                    Ok(2) => InterpolationMode::ClockwiseCircular,
                    Ok(3) => InterpolationMode::CounterclockwiseCircular,
                    _ => return None,
                });
            }
            'X' => x = number.parse::<i64>().ok(),
            'Y' => y = number.parse::<i64>().ok(),
            'I' => i = number.parse::<i64>().ok(),
            'J' => j = number.parse::<i64>().ok(),
            'D' => {
                let op_kind = match number.parse::<u32>() {
                    Ok(1) => OperationKind::Interpolate,
                    Ok(2) => OperationKind::Move,
                    Ok(3) => OperationKind::Flash,
                    _ => return None,
                };
                // the D-code terminates the command
                if bytes[index..].iter().any(|b| !b.is_ascii_whitespace()) {
                    return None;
                }
                kind = Some(op_kind);
            }
            _ => return None,
        }
    }

    Some(Node::Operation(Operation {
        kind: kind?,
        x,
        y,
        i,
        j,
        interpolation,
    }))
}
