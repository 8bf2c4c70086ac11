use crate::error::GerberError;
use std::fmt;

/// How integer coordinate literals omit zeros. Real-world files almost
/// exclusively use leading omission, but the trailing form is still legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroOmission {
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateMode {
    Absolute,
    Incremental,
}

/// Coordinate format specification (`%FSLAX26Y26*%`).
///
/// Once present in a document it fixes the interpretation of every
/// subsequent integer coordinate literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateFormat {
    pub zero_omission: ZeroOmission,
    pub mode: CoordinateMode,
    pub x_integer: u8,
    pub x_decimal: u8,
    pub y_integer: u8,
    pub y_decimal: u8,
}

impl CoordinateFormat {
    pub fn new(
        zero_omission: ZeroOmission,
        mode: CoordinateMode,
        x_integer: u8,
        x_decimal: u8,
        y_integer: u8,
        y_decimal: u8,
    ) -> Self {
        CoordinateFormat {
            zero_omission,
            mode,
            x_integer,
            x_decimal,
            y_integer,
            y_decimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Millimeters,
    Inches,
}

/// Shape template of an aperture definition: one of the four standard
/// single-letter templates, or the name of a user macro defined with `%AM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApertureTemplate {
    Circle,
    Rectangle,
    Obround,
    Polygon,
    Macro(String),
}

impl ApertureTemplate {
    pub fn from_name(name: &str) -> Self {
        match name {
            "C" => ApertureTemplate::Circle,
            "R" => ApertureTemplate::Rectangle,
            "O" => ApertureTemplate::Obround,
            "P" => ApertureTemplate::Polygon,
            other => ApertureTemplate::Macro(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ApertureTemplate::Circle => "C",
            ApertureTemplate::Rectangle => "R",
            ApertureTemplate::Obround => "O",
            ApertureTemplate::Polygon => "P",
            ApertureTemplate::Macro(name) => name,
        }
    }
}

/// Aperture definition (`%ADD10C,0.1*%`): code, template and the template's
/// parameter list. Codes below 10 are reserved by the format.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureDefinition {
    pub code: i32,
    pub template: ApertureTemplate,
    pub params: Vec<f64>,
}

/// Aperture macro (`%AMDONUT*...*%`). The body is kept as raw text; macro
/// bodies are preserved for round-trip but never evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApertureMacro {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Dark,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    None,
    X,
    Y,
    XY,
}

impl Mirroring {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mirroring::None => "N",
            Mirroring::X => "X",
            Mirroring::Y => "Y",
            Mirroring::XY => "XY",
        }
    }
}

/// Step-and-repeat block (`%SRX3Y2I5.0J4.0*%`). The close form `%SR*%`
/// parses as the 1x1 block with zero steps.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRepeat {
    pub x_count: u32,
    pub y_count: u32,
    pub i_step: f64,
    pub j_step: f64,
}

/// A file (`TF`), aperture (`TA`) or object (`TO`) attribute: a name plus
/// its ordered, comma-separated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Attribute {
            name: name.into(),
            values,
        }
    }
}

/// Interpolation and quadrant modes set by the G01/G02/G03/G74/G75 commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    ClockwiseCircular,
    CounterclockwiseCircular,
    SingleQuadrant,
    MultiQuadrant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Interpolate,
    Move,
    Flash,
}

impl OperationKind {
    pub fn dcode(&self) -> &'static str {
        match self {
            OperationKind::Interpolate => "D01",
            OperationKind::Move => "D02",
            OperationKind::Flash => "D03",
        }
    }
}

/// A drawing operation (`X1000Y2000D01*`).
///
/// Absent coordinate fields are modal: they carry the value from the
/// previous operation during render replay. When the command carried a
/// leading G01/G02/G03, the implied mode change is recorded in
/// `interpolation` so that one source command stays one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub i: Option<i64>,
    pub j: Option<i64>,
    pub interpolation: Option<InterpolationMode>,
}

impl Operation {
    pub fn new(kind: OperationKind, x: Option<i64>, y: Option<i64>) -> Self {
        Operation {
            kind,
            x,
            y,
            i: None,
            j: None,
            interpolation: None,
        }
    }
}

/// Aperture selection (`D10*`). Codes 0-9 are reserved for operations and
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectAperture {
    code: i32,
}

impl SelectAperture {
    pub fn new(code: i32) -> Result<Self, GerberError> {
        if code < 10 {
            return Err(GerberError::ApertureCodeReserved { code });
        }
        Ok(SelectAperture { code })
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

/// A single parsed Gerber command.
///
/// The document is an ordered sequence of these. Every variant carries
/// enough information to re-emit its command; `Display` produces the
/// canonical text, `Unknown` re-emits its original bytes verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    FormatSpecification(CoordinateFormat),
    UnitMode(Unit),
    ApertureDefinition(ApertureDefinition),
    ApertureMacro(ApertureMacro),
    LoadPolarity(Polarity),
    LoadMirroring(Mirroring),
    LoadRotation(f64),
    LoadScaling(f64),
    StepRepeat(StepRepeat),
    FileAttribute(Attribute),
    ApertureAttribute(Attribute),
    ObjectAttribute(Attribute),
    DeleteAttribute(Option<String>),
    InterpolationMode(InterpolationMode),
    Comment(String),
    RegionStart,
    RegionEnd,
    Operation(Operation),
    SelectAperture(SelectAperture),
    EndOfFile,
    /// Deprecated image polarity (`%IPPOS*%`), value preserved.
    ImagePolarity(String),
    /// Deprecated image offset (`%OFA0B0*%`), value preserved.
    ImageOffset(String),
    /// Anything unrecognized, kept byte-for-byte including delimiters.
    Unknown(String),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::FormatSpecification(fs) => {
                let omission = match fs.zero_omission {
                    ZeroOmission::Leading => 'L',
                    ZeroOmission::Trailing => 'T',
                };
                let mode = match fs.mode {
                    CoordinateMode::Absolute => 'A',
                    CoordinateMode::Incremental => 'I',
                };
                write!(
                    f,
                    "%FS{}{}X{}{}Y{}{}*%",
                    omission, mode, fs.x_integer, fs.x_decimal, fs.y_integer, fs.y_decimal
                )
            }
            Node::UnitMode(Unit::Millimeters) => write!(f, "%MOMM*%"),
            Node::UnitMode(Unit::Inches) => write!(f, "%MOIN*%"),
            Node::ApertureDefinition(def) => {
                write!(f, "%ADD{}{}", def.code, def.template.name())?;
                for (index, param) in def.params.iter().enumerate() {
                    let separator = if index == 0 { ',' } else { 'X' };
                    write!(f, "{}{}", separator, param)?;
                }
                write!(f, "*%")
            }
            Node::ApertureMacro(am) => write!(f, "%AM{}*{}*%", am.name, am.body),
            Node::LoadPolarity(Polarity::Dark) => write!(f, "%LPD*%"),
            Node::LoadPolarity(Polarity::Clear) => write!(f, "%LPC*%"),
            Node::LoadMirroring(mirroring) => write!(f, "%LM{}*%", mirroring.as_str()),
            Node::LoadRotation(angle) => write!(f, "%LR{}*%", angle),
            Node::LoadScaling(factor) => write!(f, "%LS{}*%", factor),
            Node::StepRepeat(sr) => write!(
                f,
                "%SRX{}Y{}I{}J{}*%",
                sr.x_count, sr.y_count, sr.i_step, sr.j_step
            ),
            Node::FileAttribute(attr) => write_attribute(f, "TF", attr),
            Node::ApertureAttribute(attr) => write_attribute(f, "TA", attr),
            Node::ObjectAttribute(attr) => write_attribute(f, "TO", attr),
            Node::DeleteAttribute(None) => write!(f, "%TD*%"),
            Node::DeleteAttribute(Some(name)) => write!(f, "%TD.{}*%", name),
            Node::InterpolationMode(mode) => write!(f, "{}*", gcode_for(*mode)),
            Node::Comment(text) => {
                if text.is_empty() {
                    write!(f, "G04*")
                } else {
                    write!(f, "G04 {}*", text)
                }
            }
            Node::RegionStart => write!(f, "G36*"),
            Node::RegionEnd => write!(f, "G37*"),
            Node::Operation(op) => {
                if let Some(mode) = op.interpolation {
                    write!(f, "{}", gcode_for(mode))?;
                }
                if let Some(x) = op.x {
                    write!(f, "X{}", x)?;
                }
                if let Some(y) = op.y {
                    write!(f, "Y{}", y)?;
                }
                if let Some(i) = op.i {
                    write!(f, "I{}", i)?;
                }
                if let Some(j) = op.j {
                    write!(f, "J{}", j)?;
                }
                write!(f, "{}*", op.kind.dcode())
            }
            Node::SelectAperture(select) => write!(f, "D{}*", select.code()),
            Node::EndOfFile => write!(f, "M02*"),
            Node::ImagePolarity(value) => write!(f, "%IP{}*%", value),
            Node::ImageOffset(value) => write!(f, "%OF{}*%", value),
            Node::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

fn write_attribute(f: &mut fmt::Formatter<'_>, prefix: &str, attr: &Attribute) -> fmt::Result {
    write!(f, "%{}.{}", prefix, attr.name)?;
    for value in &attr.values {
        write!(f, ",{}", value)?;
    }
    write!(f, "*%")
}

fn gcode_for(mode: InterpolationMode) -> &'static str {
    match mode {
        InterpolationMode::Linear => "G01",
        InterpolationMode::ClockwiseCircular => "G02",
        InterpolationMode::CounterclockwiseCircular => "G03",
        InterpolationMode::SingleQuadrant => "G74",
        InterpolationMode::MultiQuadrant => "G75",
    }
}
