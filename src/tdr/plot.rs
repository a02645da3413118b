use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::tdr::sweep::SweepResult;
use crate::tdr::TdrError;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
        }
    }
}
struct Curve {
    label: String,
    points: Vec<(f64, f64)>,
}
/// Reflected signal of every humidity level against time.
pub fn render_time_domain_png(
    result: &SweepResult,
    style: PlotStyle,
) -> Result<Vec<u8>, TdrError> {
    let time_axis = result.time_axis();
    let curves = result
        .iter()
        .map(|trace| Curve {
            label: humidity_label(trace.humidity),
            points: time_axis
                .iter()
                .copied()
                .zip(trace.reflected.samples().iter().copied())
                .collect(),
        })
        .collect::<Vec<_>>();
    render_curves(
        &curves,
        "TDR Signal with Different Humidity Levels",
        "Time (s)",
        "Amplitude",
        style,
    )
}
/// `20 log10 |Γ|` of every humidity level against frequency.
pub fn render_s11_png(result: &SweepResult, style: PlotStyle) -> Result<Vec<u8>, TdrError> {
    let curves = result
        .iter()
        .map(|trace| Curve {
            label: humidity_label(trace.humidity),
            points: trace
                .frequencies_hz
                .iter()
                .copied()
                .zip(trace.s11_db.iter().copied())
                .collect(),
        })
        .collect::<Vec<_>>();
    render_curves(
        &curves,
        "S11 Parameter (Reflection Coefficient) vs Frequency",
        "Frequency (Hz)",
        "Magnitude (dB)",
        style,
    )
}
fn humidity_label(humidity: f64) -> String {
    format!("Humidity: {humidity:.1}")
}
fn render_curves(
    curves: &[Curve],
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    style: PlotStyle,
) -> Result<Vec<u8>, TdrError> {
    if curves.iter().all(|c| c.points.is_empty()) {
        return Err(TdrError::Plot("sweep result has no samples".into()));
    }
    let (x_min, x_max) = bounds(curves.iter().flat_map(|c| c.points.iter().map(|p| p.0)));
    let (y_min, y_max) = bounds(curves.iter().flat_map(|c| c.points.iter().map(|p| p.1)));
    let y_pad = ((y_max - y_min) * 0.05).max(1e-9);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(caption, ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(x_min..x_max.max(x_min + 1e-12), (y_min - y_pad)..(y_max + y_pad))?;
        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .axis_desc_style(("sans-serif", 14).into_font().color(&WHITE))
            .label_style(("sans-serif", 12).into_font().color(&WHITE))
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        for (idx, curve) in curves.iter().enumerate() {
            let color = style.palette[idx % style.palette.len()];
            chart
                .draw_series(LineSeries::new(curve.points.iter().copied(), &color))?
                .label(curve.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        chart
            .configure_series_labels()
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .label_font(("sans-serif", 12).into_font().color(&WHITE))
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, TdrError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| TdrError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
