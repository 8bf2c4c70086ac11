use crate::ast::{
    ApertureDefinition, ApertureTemplate, CoordinateFormat, InterpolationMode, Node, Operation,
    OperationKind, Polarity, Unit,
};
use crate::document::GerberDoc;
use std::collections::HashMap;
use std::fmt::Write;

/// Fallback radius for flashes whose template the renderer cannot shape
/// (polygons and macros).
const FALLBACK_FLASH_RADIUS: f64 = 0.005;

/// Decimal digits assumed for coordinate conversion when the document
/// carries no format specification.
const DEFAULT_DECIMAL_DIGITS: u8 = 4;

/// Options for [`render_svg`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Multiplies the SVG's declared width/height; the drawing itself stays
    /// in user units via the viewBox.
    pub scale: f64,
    /// Trace (stroke) color.
    pub stroke_color: String,
    /// Flash and region (fill) color.
    pub fill_color: String,
    /// Full-canvas background rectangle; `None` leaves the canvas bare.
    pub background_color: Option<String>,
    /// User-unit margin around the drawing's bounding box.
    pub padding: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            scale: 1.0,
            stroke_color: "#000".to_string(),
            fill_color: "#000".to_string(),
            background_color: None,
            padding: 0.1,
        }
    }
}

/// Render a document to an SVG preview.
///
/// The node sequence is replayed in order against a graphics state
/// reproducing Gerber's modal semantics: omitted coordinates carry the
/// previous axis value forward, region mode changes the meaning of D01/D02,
/// and integer literals are scaled by the format specification in force.
///
/// Rendering is total. Nodes without a geometric effect in this renderer
/// (macros, transforms, step-and-repeat, attributes, unknown commands) are
/// skipped; a flash or stroke with no usable aperture is dropped with a
/// warning. Arcs are approximated by straight segments.
pub fn render_svg(doc: &GerberDoc, options: &RenderOptions) -> String {
    let mut renderer = Renderer::new(options);
    for node in doc.nodes() {
        renderer.replay(node);
    }
    renderer.finish()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn empty() -> Self {
        Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    fn update(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

struct Renderer<'a> {
    options: &'a RenderOptions,

    // graphics state, replayed through the node sequence
    x: f64,
    y: f64,
    aperture: Option<&'a ApertureDefinition>,
    interpolation: InterpolationMode,
    in_region: bool,
    polarity: Polarity,
    unit: Unit,
    format: Option<&'a CoordinateFormat>,

    apertures: HashMap<i32, &'a ApertureDefinition>,
    bounds: Bounds,

    // output accumulators
    regions: Vec<String>,
    traces: Vec<String>,
    flashes: Vec<String>,
    region_path: String,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Renderer {
            options,
            x: 0.0,
            y: 0.0,
            aperture: None,
            interpolation: InterpolationMode::Linear,
            in_region: false,
            polarity: Polarity::Dark,
            unit: Unit::Inches,
            format: None,
            apertures: HashMap::new(),
            bounds: Bounds::empty(),
            regions: Vec::new(),
            traces: Vec::new(),
            flashes: Vec::new(),
            region_path: String::new(),
        }
    }

    fn replay(&mut self, node: &'a Node) {
        match node {
            Node::FormatSpecification(fs) => self.format = Some(fs),
            Node::UnitMode(unit) => self.unit = *unit,
            Node::ApertureDefinition(def) => {
                self.apertures.insert(def.code, def);
            }
            Node::SelectAperture(select) => {
                self.aperture = self.apertures.get(&select.code()).copied();
                if self.aperture.is_none() {
                    log::warn!("selected aperture D{} before its definition", select.code());
                }
            }
            Node::InterpolationMode(mode) => self.set_interpolation(*mode),
            Node::LoadPolarity(polarity) => self.polarity = *polarity,
            Node::RegionStart => {
                self.in_region = true;
                self.region_path.clear();
            }
            Node::RegionEnd => self.close_region(),
            Node::Operation(op) => self.operation(op),
            // preserved structurally, no geometric effect here
            _ => {}
        }
    }

    fn set_interpolation(&mut self, mode: InterpolationMode) {
        match mode {
            InterpolationMode::Linear
            | InterpolationMode::ClockwiseCircular
            | InterpolationMode::CounterclockwiseCircular => self.interpolation = mode,
            // quadrant modes only govern arc semantics, which are
            // approximated as straight segments here
            InterpolationMode::SingleQuadrant | InterpolationMode::MultiQuadrant => {}
        }
    }

    fn close_region(&mut self) {
        if !self.region_path.is_empty() {
            self.regions.push(format!(
                "<path d=\"{} Z\" fill=\"{}\" fill-rule=\"evenodd\" />",
                self.region_path, self.options.fill_color
            ));
            self.region_path.clear();
        }
        self.in_region = false;
    }

    fn operation(&mut self, op: &Operation) {
        if let Some(mode) = op.interpolation {
            self.set_interpolation(mode);
        }

        let (x_decimals, y_decimals) = match self.format {
            Some(fs) => (fs.x_decimal, fs.y_decimal),
            None => (DEFAULT_DECIMAL_DIGITS, DEFAULT_DECIMAL_DIGITS),
        };
        let new_x = op.x.map(|v| to_user_units(v, x_decimals)).unwrap_or(self.x);
        let new_y = op.y.map(|v| to_user_units(v, y_decimals)).unwrap_or(self.y);
        self.bounds.update(new_x, new_y);

        match op.kind {
            OperationKind::Interpolate => self.interpolate(new_x, new_y),
            OperationKind::Move => {
                if self.in_region && !self.region_path.is_empty() {
                    // a move inside a region begins a new sub-contour
                    let _ = write!(self.region_path, " M {} {}", new_x, new_y);
                }
            }
            OperationKind::Flash => {
                if !self.in_region {
                    self.flash(new_x, new_y);
                }
            }
        }

        self.x = new_x;
        self.y = new_y;
    }

    fn interpolate(&mut self, new_x: f64, new_y: f64) {
        if self.interpolation != InterpolationMode::Linear {
            log::debug!("approximating circular interpolation as a straight segment");
        }
        if self.in_region {
            if self.region_path.is_empty() {
                let _ = write!(self.region_path, "M {} {}", self.x, self.y);
            }
            let _ = write!(self.region_path, " L {} {}", new_x, new_y);
        } else if let Some(def) = self.aperture {
            // the first parameter of a circular aperture is its diameter;
            // the same heuristic doubles as stroke width for the other
            // templates
            let width = def.params.first().copied().unwrap_or(0.0);
            self.traces.push(format!(
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" />",
                self.x, self.y, new_x, new_y, self.options.stroke_color, width
            ));
        }
    }

    fn flash(&mut self, x: f64, y: f64) {
        let Some(def) = self.aperture else {
            log::warn!("flash at ({}, {}) with no aperture selected", x, y);
            return;
        };
        let fill = &self.options.fill_color;
        match &def.template {
            ApertureTemplate::Circle => {
                let radius = def.params.first().copied().unwrap_or(0.0) / 2.0;
                self.bounds.update(x - radius, y - radius);
                self.bounds.update(x + radius, y + radius);
                self.flashes.push(format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" />",
                    x, y, radius, fill
                ));
            }
            ApertureTemplate::Rectangle | ApertureTemplate::Obround => {
                let width = def.params.first().copied().unwrap_or(0.0);
                let height = def.params.get(1).copied().unwrap_or(width);
                self.bounds.update(x - width / 2.0, y - height / 2.0);
                self.bounds.update(x + width / 2.0, y + height / 2.0);
                let corner = if matches!(def.template, ApertureTemplate::Obround) {
                    format!(" rx=\"{}\"", width.min(height) / 2.0)
                } else {
                    String::new()
                };
                self.flashes.push(format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{} fill=\"{}\" />",
                    x - width / 2.0,
                    y - height / 2.0,
                    width,
                    height,
                    corner,
                    fill
                ));
            }
            ApertureTemplate::Polygon | ApertureTemplate::Macro(_) => {
                self.flashes.push(format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" />",
                    x, y, FALLBACK_FLASH_RADIUS, fill
                ));
            }
        }
    }

    fn finish(mut self) -> String {
        // an open region at end of input is flushed as if G37 had been seen
        self.close_region();

        log::debug!(
            "rendered {} regions, {} traces, {} flashes (unit {:?}, polarity {:?})",
            self.regions.len(),
            self.traces.len(),
            self.flashes.len(),
            self.unit,
            self.polarity,
        );

        let bounds = if self.bounds.is_empty() {
            Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            }
        } else {
            self.bounds
        };

        let padding = self.options.padding;
        let min_x = bounds.min_x - padding;
        let min_y = bounds.min_y - padding;
        let width = bounds.max_x - bounds.min_x + 2.0 * padding;
        let height = bounds.max_y - bounds.min_y + 2.0 * padding;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            width * self.options.scale,
            height * self.options.scale,
            width,
            height
        );
        if let Some(background) = &self.options.background_color {
            let _ = writeln!(
                svg,
                "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" />",
                width, height, background
            );
        }
        // flip the Y axis so Gerber's +Y-up space displays upright in SVG
        let _ = writeln!(
            svg,
            "<g transform=\"translate(0,{}) scale(1,-1) translate({},{})\">",
            height, -min_x, -min_y
        );
        for path in &self.regions {
            let _ = writeln!(svg, "{}", path);
        }
        for line in &self.traces {
            let _ = writeln!(svg, "{}", line);
        }
        for shape in &self.flashes {
            let _ = writeln!(svg, "{}", shape);
        }
        let _ = writeln!(svg, "</g>");
        svg.push_str("</svg>\n");
        svg
    }
}

/// Convert a fixed-point coordinate literal to user units using the axis's
/// declared decimal-digit count.
fn to_user_units(value: i64, decimals: u8) -> f64 {
    value as f64 / 10f64.powi(decimals as i32)
}
