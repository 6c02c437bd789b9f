//! # Card Scenario Tests
//!
//! These tests drive the card the way the host does: parse a configuration,
//! check it against a snapshot, then run a series of state ticks through the
//! corner renderer. They run quickly and need no network or display.

use crate::config::{CardConfig, SpeedUnit};
use crate::corner_renderer::CornerInfoRenderer;
use crate::entity_checker::check_entities;
use crate::graphics_surface::GraphicsSurface;
use crate::state::{resolve_corner_states, EntityStateRecord, StateSnapshot};
use crate::surface::SvgSurface;
use crate::Corner;
use embedded_graphics::{
    mock_display::MockDisplay, mono_font::ascii::FONT_6X10, pixelcolor::BinaryColor, prelude::*,
};

const CARD: &str = r##"
[wind_direction]
entity = "sensor.wind_direction"

[[windspeed_entities]]
entity = "sensor.wind"
speed_unit = "auto"

[corners.top_left]
show = true
entity = "sensor.temperature"
label = "Temp"
color = "#e53935"
precision = 1
unit = "°C"

[corners.top_right]
show = true
entity = "sensor.gust"
label = "Gust"
precision = 0
unit = "kt"

[corners.bottom_left]
show = false
entity = "sensor.not_installed"

[corners.bottom_right]
show = true
entity = "sensor.status"
"##;

fn snapshot(temperature: &str, gust: &str, status: &str) -> StateSnapshot {
    StateSnapshot::from_records([
        EntityStateRecord::new("sensor.wind_direction", "225"),
        EntityStateRecord::new("sensor.wind", "6.1").with_unit("m/s"),
        EntityStateRecord::new("sensor.temperature", temperature).with_unit("°C"),
        EntityStateRecord::new("sensor.gust", gust).with_unit("kt"),
        EntityStateRecord::new("sensor.status", status),
    ])
}

/// Auto speed units take the entity's declared unit.
#[test]
fn auto_speed_unit_is_inferred() {
    let config = CardConfig::from_toml_str(CARD).unwrap();
    let resolved = check_entities(&config, &snapshot("20", "10", "ok")).unwrap();

    assert_eq!(
        resolved.windspeed_entities[0].speed_unit,
        SpeedUnit::Fixed("m/s".to_string())
    );
}

/// A shown corner whose entity is missing stops the card before drawing.
#[test]
fn missing_corner_entity_aborts_setup() {
    let mut config = CardConfig::from_toml_str(CARD).unwrap();
    config.corners[Corner::TopLeft].entity = Some("sensor.missing".to_string());

    let err = check_entities(&config, &snapshot("20", "10", "ok")).unwrap_err();
    assert_eq!(err.to_string(), "Entity sensor.missing not found.");
}

/// Labels once, values every tick, never more than four values live.
#[test]
fn ticks_redraw_corner_values() {
    let config = CardConfig::from_toml_str(CARD).unwrap();
    let config = check_entities(&config, &snapshot("20", "10", "ok")).unwrap();

    let surface = SvgSurface::new(config.dimensions.width, config.dimensions.height);
    let mut renderer = CornerInfoRenderer::from_card(&config, surface);
    renderer.draw_corner_labels();

    let first = snapshot("21.46", "12.5", "ok");
    renderer.draw_corner_values(&resolve_corner_states(&config.corners, &first));
    assert_eq!(
        renderer.surface().texts(),
        vec!["Temp", "Gust", "21.5°C", "13kt", "ok"]
    );

    let readings = [("19.04", "8.4", "calm"), ("n/a", "30", "storm")];
    for (temperature, gust, status) in readings {
        let tick = snapshot(temperature, gust, status);
        renderer.update_corner_values(&resolve_corner_states(&config.corners, &tick));
        assert_eq!(renderer.surface().live_count(), 5);
    }
    assert_eq!(
        renderer.surface().texts(),
        vec!["Temp", "Gust", "n/a°C", "30kt", "storm"]
    );
    assert!(!renderer.element(Corner::BottomLeft).is_drawn());

    let markup = renderer.surface().to_svg_string();
    assert!(markup.contains("n/a°C"));
    assert!(!markup.contains("21.5°C"));
}

/// The same tick sequence renders onto a pixel display.
#[test]
fn ticks_render_on_pixel_display() {
    let config = CardConfig::from_toml_str(CARD).unwrap();
    let mut config = check_entities(&config, &snapshot("20", "10", "ok")).unwrap();
    config.dimensions.width = 64.0;
    config.dimensions.height = 64.0;
    config.dimensions.corner_label_font_size = 10.0;

    let mut display: MockDisplay<BinaryColor> = MockDisplay::new();
    display.set_allow_overdraw(true);
    let surface =
        GraphicsSurface::new(display, BinaryColor::On, BinaryColor::Off).with_font(&FONT_6X10);
    let mut renderer = CornerInfoRenderer::from_card(&config, surface);

    renderer.draw_corner_values(&resolve_corner_states(&config.corners, &snapshot("1", "2", "3")));
    for _ in 0..5 {
        renderer.update_corner_values(&resolve_corner_states(&config.corners, &snapshot("4", "5", "6")));
    }

    let display = renderer.into_surface().into_inner();
    let lit = (0..64)
        .flat_map(|x| (0..64).map(move |y| Point::new(x, y)))
        .filter(|&p| display.get_pixel(p) == Some(BinaryColor::On))
        .count();
    assert!(lit > 0, "No pixels were drawn to the display");
}
