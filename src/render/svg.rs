use crate::charge::Charge;
use crate::config::RenderParams;
use crate::util::fmt_float;

use super::streamlines::Streamline;

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 36.0;

/// Matplotlib marker sizes are areas in pt²; the image is drawn at 100 dpi.
const PX_PER_PT: f64 = 100.0 / 72.0;

const STREAM_COLOR: &str = "#1f77b4";
const POSITIVE_COLOR: &str = "green";
const NON_POSITIVE_COLOR: &str = "red";

/// Data-to-pixel mapping with equal x/y scale, centred in the plot area.
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    bounds: (f64, f64, f64, f64),
}

impl PlotFrame {
    pub fn new(image_w: u32, image_h: u32, bounds: (f64, f64, f64, f64)) -> Self {
        let (x1, y1, x2, y2) = bounds;
        let avail_w = (image_w as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let avail_h = (image_h as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let scale = (avail_w / (x2 - x1)).min(avail_h / (y2 - y1));
        let width = scale * (x2 - x1);
        let height = scale * (y2 - y1);
        Self {
            left: MARGIN_LEFT + (avail_w - width) / 2.0,
            top: MARGIN_TOP + (avail_h - height) / 2.0,
            width,
            height,
            bounds,
        }
    }

    pub fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        let (x1, y1, x2, y2) = self.bounds;
        (
            self.left + (x - x1) / (x2 - x1) * self.width,
            self.top + (y2 - y) / (y2 - y1) * self.height,
        )
    }
}

pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Roughly `target` ticks at 1, 2 or 5 times a power of ten.
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let span = hi - lo;
    if !(span.is_finite() && span > 0.0) || target == 0 {
        return Vec::new();
    }
    let raw = span / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn header(w: u32, h: u32) -> String {
    format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n"
    )
}

fn axes(svg: &mut String, frame: &PlotFrame) {
    let (x1, y1, x2, y2) = frame.bounds;
    svg.push_str(&format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"black\" stroke-width=\"0.8\"/>\n",
        frame.left, frame.top, frame.width, frame.height
    ));

    let bottom = frame.top + frame.height;
    for t in nice_ticks(x1, x2, 6) {
        let (px, _) = frame.to_px(t, y1);
        svg.push_str(&format!(
            "<line x1=\"{px:.1}\" y1=\"{bottom:.1}\" x2=\"{px:.1}\" y2=\"{:.1}\" stroke=\"black\" stroke-width=\"0.8\"/>\n",
            bottom + 4.0
        ));
        svg.push_str(&format!(
            "<text x=\"{px:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>\n",
            bottom + 16.0,
            tick_label(t)
        ));
    }
    for t in nice_ticks(y1, y2, 6) {
        let (_, py) = frame.to_px(x1, t);
        svg.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{py:.1}\" x2=\"{:.1}\" y2=\"{py:.1}\" stroke=\"black\" stroke-width=\"0.8\"/>\n",
            frame.left - 4.0,
            frame.left
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\" font-family=\"sans-serif\">{}</text>\n",
            frame.left - 7.0,
            py + 3.5,
            tick_label(t)
        ));
    }
}

fn tick_label(t: f64) -> String {
    // -0 would otherwise print as "-0"
    let t = if t == 0.0 { 0.0 } else { t };
    format!("{}", (t * 1e6).round() / 1e6)
}

fn streamline(svg: &mut String, frame: &PlotFrame, line: &Streamline, params: &RenderParams) {
    let pts: Vec<String> = line
        .points
        .iter()
        .map(|&(x, y)| {
            let (px, py) = frame.to_px(x, y);
            format!("{:.1},{:.1}", px, py)
        })
        .collect();
    svg.push_str(&format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"/>\n",
        pts.join(" "),
        STREAM_COLOR,
        params.line_width
    ));

    if let Some(((x, y), (ux, uy))) = line.midpoint_direction() {
        let (px, py) = frame.to_px(x, y);
        // screen y grows downward
        let (dx, dy) = (ux, -uy);
        let size = 4.0 + 2.0 * params.line_width;
        let tip = (px + dx * size, py + dy * size);
        let left = (px - dy * size * 0.5, py + dx * size * 0.5);
        let right = (px + dy * size * 0.5, py - dx * size * 0.5);
        svg.push_str(&format!(
            "<polygon points=\"{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}\" fill=\"{}\"/>\n",
            tip.0, tip.1, left.0, left.1, right.0, right.1, STREAM_COLOR
        ));
    }
}

fn charge_marker(svg: &mut String, frame: &PlotFrame, charge: &Charge, params: &RenderParams) {
    let (px, py) = frame.to_px(charge.x, charge.y);
    let radius = (charge.q.abs() * params.marker_scale).sqrt() / 2.0 * PX_PER_PT;
    let color = if charge.is_positive() {
        POSITIVE_COLOR
    } else {
        NON_POSITIVE_COLOR
    };
    if radius > 0.0 {
        svg.push_str(&format!(
            "<circle cx=\"{px:.1}\" cy=\"{py:.1}\" r=\"{radius:.2}\" fill=\"{color}\"/>\n"
        ));
    }

    let (lx, ly) = frame.to_px(charge.x + 0.1, charge.y - 0.3);
    svg.push_str(&format!(
        "<text x=\"{lx:.1}\" y=\"{ly:.1}\" font-size=\"10\" font-family=\"sans-serif\" fill=\"black\">{} unit</text>\n",
        fmt_float(charge.q)
    ));
}

/// Streamlines under the charge markers, then labels, framed and titled.
pub fn render_svg(
    charges: &[Charge],
    lines: &[Streamline],
    bounds: (f64, f64, f64, f64),
    params: &RenderParams,
) -> String {
    let frame = PlotFrame::new(params.width, params.height, bounds);
    let mut svg = header(params.width, params.height);

    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>\n",
        params.width as f64 / 2.0,
        MARGIN_TOP - 14.0,
        xml_escape(&params.title)
    ));

    svg.push_str(&format!(
        "<clipPath id=\"plot-area\"><rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"/></clipPath>\n",
        frame.left, frame.top, frame.width, frame.height
    ));
    svg.push_str("<g clip-path=\"url(#plot-area)\">\n");
    for line in lines {
        streamline(&mut svg, &frame, line, params);
    }
    for charge in charges {
        charge_marker(&mut svg, &frame, charge, params);
    }
    svg.push_str("</g>\n");

    axes(&mut svg, &frame);
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cover_default_region() {
        assert_eq!(nice_ticks(-6.0, 6.0, 6), vec![-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn frame_keeps_aspect_equal() {
        let frame = PlotFrame::new(640, 480, (-6.0, -6.0, 6.0, 6.0));
        assert!((frame.width - frame.height).abs() < 1e-9);
        let (px, py) = frame.to_px(-6.0, 6.0);
        assert!((px - frame.left).abs() < 1e-9);
        assert!((py - frame.top).abs() < 1e-9);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(xml_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
