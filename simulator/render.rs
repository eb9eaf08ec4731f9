//! render.rs - Draws the café scene onto any Rgb888 target
//!
//! embedded-graphics has no alpha, so translucent layers are blended
//! against the paper background before drawing.

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{
        Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle, Triangle,
    },
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use morii::{Cafe, Category, Entity, Hsb, SmoothField, Synth, STAIN_POINTS};

use crate::panel::CounterPanel;

pub const BACKGROUND: Hsb = Hsb::new(40.0, 20.0, 95.0);
const LINK_COLOR: Hsb = Hsb::new(35.0, 20.0, 50.0);
const TEXT_COLOR: Hsb = Hsb::new(30.0, 40.0, 25.0);
const PANEL_COLOR: Hsb = Hsb::new(40.0, 8.0, 100.0);

/// (scale, saturation, brightness, alpha) for each stain layer, back to front
const STAIN_LAYERS: [(f32, f32, f32, f32); 3] = [
    (1.5, 0.4, 1.2, 0.2),
    (1.0, 0.7, 0.85, 0.5),
    (0.5, 0.85, 0.6, 0.7),
];

pub fn hsb_to_rgb(color: Hsb) -> Rgb888 {
    let h = color.h.rem_euclid(360.0) / 60.0;
    let s = (color.s / 100.0).clamp(0.0, 1.0);
    let v = (color.b / 100.0).clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb888::new(to_u8(r), to_u8(g), to_u8(b))
}

/// Mix `fg` over `bg` at `alpha` in [0, 1]
pub fn blend(fg: Rgb888, bg: Rgb888, alpha: f32) -> Rgb888 {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f32 * a + b as f32 * (1.0 - a)).round() as u8;
    Rgb888::new(mix(fg.r(), bg.r()), mix(fg.g(), bg.g()), mix(fg.b(), bg.b()))
}

fn paint(color: Hsb, alpha: f32) -> Rgb888 {
    blend(hsb_to_rgb(color), hsb_to_rgb(BACKGROUND), alpha)
}

fn center(e: &Entity) -> Point {
    Point::new(e.x.round() as i32, e.y.round() as i32)
}

/// Outline point `i` of `e`, rotated and scaled, in screen space
fn outline_point(e: &Entity, i: usize, scale: f32) -> Point {
    let (sin, cos) = e.rotation.sin_cos();
    let o = e.shape[i % STAIN_POINTS];
    let x = (o.x * cos - o.y * sin) * scale;
    let y = (o.x * sin + o.y * cos) * scale;
    Point::new((e.x + x).round() as i32, (e.y + y).round() as i32)
}

fn draw_stain<D>(display: &mut D, e: &Entity) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let base = e.category.color();
    let c = center(e);

    for (scale, sat, bright, alpha) in STAIN_LAYERS {
        let style = PrimitiveStyle::with_fill(paint(base.shade(sat, bright), alpha * e.opacity));
        for i in 0..STAIN_POINTS {
            Triangle::new(c, outline_point(e, i, scale), outline_point(e, i + 1, scale))
                .into_styled(style)
                .draw(display)?;
        }
    }

    let spot = (e.size * 0.2).round().max(1.0) as u32;
    Circle::with_center(c, spot)
        .into_styled(PrimitiveStyle::with_fill(paint(base.shade(0.9, 0.4), 0.85 * e.opacity)))
        .draw(display)?;
    Ok(())
}

fn draw_isolation_ring<D>(display: &mut D, e: &Entity) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let color = paint(e.category.color().shade(0.6, 0.8), 0.4 * e.opacity);
    Circle::with_center(center(e), (e.size * 2.5).round() as u32)
        .into_styled(PrimitiveStyle::with_stroke(color, 2))
        .draw(display)?;
    Ok(())
}

/// Day progress as a percentage with a ten-cell bar
fn progress_label(progress: f32) -> String {
    let percent = (progress.clamp(0.0, 1.0) * 100.0).floor() as u32;
    let filled = (percent / 10) as usize;
    format!("[{}{}] {:>3}%", "#".repeat(filled), ".".repeat(10 - filled), percent)
}

fn draw_panel<D>(
    display: &mut D,
    day: &morii::DayRecord,
    progress: f32,
    panel: &CounterPanel,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let frame = Rectangle::new(Point::new(20, 20), Size::new(300, 120));
    let style = PrimitiveStyleBuilder::new()
        .fill_color(paint(PANEL_COLOR, 0.85))
        .stroke_color(paint(TEXT_COLOR, 0.3))
        .stroke_width(1)
        .build();
    RoundedRectangle::with_equal_corners(frame, Size::new(8, 8))
        .into_styled(style)
        .draw(display)?;

    let heading = MonoTextStyle::new(&FONT_10X20, hsb_to_rgb(TEXT_COLOR));
    let body = MonoTextStyle::new(&FONT_6X10, hsb_to_rgb(TEXT_COLOR));

    let title = format!("Day {} ({})", day.day, day.time_range);
    Text::with_baseline(&title, Point::new(32, 30), heading, Baseline::Top).draw(display)?;

    let people = format!("People: {} -> {}", day.start_count, day.end_count);
    Text::with_baseline(&people, Point::new(32, 58), body, Baseline::Top).draw(display)?;

    for (row, category) in Category::ALL.into_iter().enumerate() {
        let y = 74 + row as i32 * 14;
        Circle::with_center(Point::new(37, y + 4), 8)
            .into_styled(PrimitiveStyle::with_fill(hsb_to_rgb(category.color())))
            .draw(display)?;
        let line = format!("{:<7}{:>3}", category.label(), day.count(category));
        Text::with_baseline(&line, Point::new(48, y), body, Baseline::Top).draw(display)?;
    }

    let counts = format!("stains {}  links {}", panel.entities, panel.connections);
    Text::with_baseline(&counts, Point::new(180, 74), body, Baseline::Top).draw(display)?;
    let peak = format!("peak links {}", panel.peak_connections);
    Text::with_baseline(&peak, Point::new(180, 88), body, Baseline::Top).draw(display)?;
    let progress = progress_label(progress);
    Text::with_baseline(&progress, Point::new(180, 102), body, Baseline::Top).draw(display)?;
    Ok(())
}

/// Draw one frame: links, isolation rings, stains, caption, data panel
pub fn render_frame<D, S, F, const N: usize>(
    display: &mut D,
    cafe: &Cafe<S, F, N>,
    panel: &CounterPanel,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
    S: Synth,
    F: SmoothField,
{
    display.clear(hsb_to_rgb(BACKGROUND))?;

    let entities = cafe.entities();

    for link in cafe.links() {
        let (a, b) = (&entities[link.a], &entities[link.b]);
        Line::new(center(a), center(b))
            .into_styled(PrimitiveStyle::with_stroke(paint(LINK_COLOR, link.alpha), 1))
            .draw(display)?;
    }

    for (e, isolated) in entities.iter().zip(cafe.isolation_flags()) {
        if isolated {
            draw_isolation_ring(display, e)?;
        }
    }

    for e in entities {
        draw_stain(display, e)?;
    }

    if let Some(caption) = cafe.caption() {
        let size = display.bounding_box().size;
        let style = MonoTextStyle::new(&FONT_10X20, paint(TEXT_COLOR, caption.alpha));
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        // FONT_10X20 is ASCII only
        let text = caption.text.replace('\u{2014}', "-");
        let at = Point::new(size.width as i32 / 2, size.height as i32 / 2);
        Text::with_text_style(&text, at, style, text_style).draw(display)?;
    }

    if let Some(day) = cafe.current_day() {
        draw_panel(display, day, cafe.day_progress(), panel)?;
    }
    Ok(())
}
