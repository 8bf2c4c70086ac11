use gerber_view::{parse, render_svg, RenderOptions};

mod util;
use util::testing::logging_init;

fn options() -> RenderOptions {
    RenderOptions::default()
}

/// Minimal move+draw: one trace from (0,0) to (1,1) with the aperture
/// diameter as stroke width.
#[test]
fn minimal_move_and_draw() {
    // given
    logging_init();

    let source = "%FSLAX26Y26*%\n%MOMM*%\n%ADD10C,0.1*%\nD10*\nX0Y0D02*\nX1000000Y1000000D01*\nM02*";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains(
        "<line x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\" stroke=\"#000\" stroke-width=\"0.1\" stroke-linecap=\"round\" />"
    ));
}

#[test]
fn circular_flash() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD10C,0.5*%
    D10*
    X500000Y500000D03*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("<circle cx=\"0.5\" cy=\"0.5\" r=\"0.25\" fill=\"#000\" />"));
}

#[test]
fn rectangular_flash() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD11R,1.0X0.5*%
    D11*
    X500000Y500000D03*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("<rect x=\"0\" y=\"0.25\" width=\"1\" height=\"0.5\" fill=\"#000\" />"));
}

/// An obround is the rectangle with fully rounded short sides.
#[test]
fn obround_flash_has_corner_radius() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD12O,1.0X0.5*%
    D12*
    X0Y0D03*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("rx=\"0.25\""));
}

/// A rectangle flash with a single parameter is square.
#[test]
fn rectangle_height_defaults_to_width() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD11R,0.4*%
    D11*
    X0Y0D03*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("width=\"0.4\" height=\"0.4\""));
}

/// Polygon and macro templates fall back to a small marker circle.
#[test]
fn unshaped_templates_flash_a_fallback_circle() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD13P,1.0X6*%
    D13*
    X0Y0D03*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("r=\"0.005\""));
}

#[test]
fn region_becomes_filled_path() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    G36*
    X0Y0D02*
    X1000000D01*
    Y1000000D01*
    X0D01*
    Y0D01*
    G37*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("<path d=\"M 0 0 L 1 0 L 1 1 L 0 1 L 0 0 Z\" fill=\"#000\" fill-rule=\"evenodd\" />"));
}

/// A move inside a region begins a new sub-contour; with evenodd filling
/// this cuts a hole.
#[test]
fn region_move_starts_sub_contour() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    G36*
    X0Y0D02*
    X4000000D01*
    Y4000000D01*
    X0D01*
    Y0D01*
    X1000000Y1000000D02*
    X3000000D01*
    Y3000000D01*
    X1000000D01*
    Y1000000D01*
    G37*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains(" M 1 1 L 3 1 L 3 3 L 1 3 L 1 1 Z\""));
}

/// An unmatched G36 is implicitly closed at end of input.
#[test]
fn open_region_is_flushed_at_end_of_input() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    G36*
    X0Y0D02*
    X1000000D01*
    Y1000000D01*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("Z\" fill=\"#000\" fill-rule=\"evenodd\" />"));
}

/// Omitted coordinates carry the previous axis value forward.
#[test]
fn coordinates_are_modal() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD10C,0.1*%
    D10*
    X1000000Y2000000D02*
    X3000000D01*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("<line x1=\"1\" y1=\"2\" x2=\"3\" y2=\"2\""));
}

/// Without a format specification four decimal digits are assumed.
#[test]
fn default_format_assumes_four_decimals() {
    // given
    logging_init();

    let source = "
    %MOMM*%
    %ADD10C,0.1*%
    D10*
    X0Y0D02*
    X10000Y0D01*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("x2=\"1\" y2=\"0\""));
}

/// Each axis converts with its own decimal-digit count.
#[test]
fn per_axis_decimal_digits() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y24*%
    %MOMM*%
    %ADD10C,0.1*%
    D10*
    X0Y0D02*
    X1000000Y10000D01*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("x2=\"1\" y2=\"1\""));
}

/// A flash with no usable aperture is dropped, not an error.
#[test]
fn flash_without_aperture_is_skipped() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    D99*
    X0Y0D03*
    M02*
    ";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(!svg.contains("<circle"));
    assert!(!svg.contains("<rect"));
}

#[test]
fn viewbox_is_padded_and_y_flipped() {
    // given
    logging_init();

    let source = "%FSLAX26Y26*%\n%MOMM*%\n%ADD10C,0.1*%\nD10*\nX0Y0D02*\nX1000000Y1000000D01*\nM02*";

    // when
    let svg = render_svg(&parse(source), &options());

    // then
    assert!(svg.contains("viewBox=\"0 0 1.2 1.2\""));
    assert!(svg.contains("<g transform=\"translate(0,1.2) scale(1,-1) translate(0.1,0.1)\">"));
}

#[test]
fn scale_multiplies_declared_size_only() {
    // given
    logging_init();

    let source = "%FSLAX26Y26*%\n%MOMM*%\n%ADD10C,0.1*%\nD10*\nX0Y0D02*\nX1000000Y1000000D01*\nM02*";

    // when
    let svg = render_svg(
        &parse(source),
        &RenderOptions {
            scale: 10.0,
            ..RenderOptions::default()
        },
    );

    // then
    assert!(svg.contains("width=\"12\" height=\"12\""));
    assert!(svg.contains("viewBox=\"0 0 1.2 1.2\""));
}

#[test]
fn background_rectangle_is_optional() {
    // given
    logging_init();

    let source = "%FSLAX26Y26*%\n%MOMM*%\nM02*";

    // when
    let bare = render_svg(&parse(source), &options());
    let with_background = render_svg(
        &parse(source),
        &RenderOptions {
            background_color: Some("#fff".to_string()),
            ..RenderOptions::default()
        },
    );

    // then
    assert!(!bare.contains("<rect"));
    assert!(with_background.contains("fill=\"#fff\""));
}

#[test]
fn colors_are_configurable() {
    // given
    logging_init();

    let source = "
    %FSLAX26Y26*%
    %MOMM*%
    %ADD10C,0.2*%
    D10*
    X0Y0D02*
    X1000000D01*
    X2000000Y0D03*
    M02*
    ";

    // when
    let svg = render_svg(
        &parse(source),
        &RenderOptions {
            stroke_color: "#c93".to_string(),
            fill_color: "#950".to_string(),
            ..RenderOptions::default()
        },
    );

    // then
    assert!(svg.contains("stroke=\"#c93\""));
    assert!(svg.contains("fill=\"#950\""));
}
