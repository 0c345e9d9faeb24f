//! SVG context: accumulates SVG elements for formatted voices and
//! produces the final string. Noteheads are placed on a treble stave.

use super::constants::*;
use super::DrawContext;
use crate::pitch::{Alteration, Pitch};
use crate::stave::Stave;
use crate::tables::RESOLUTION;
use crate::tickable::{Tickable, TickableKind};

/// Diatonic step of the bottom treble line (E4), counting C0 as 0.
const BOTTOM_LINE_STEP: i32 = 4 * 7 + 2;

// ═══════════════════════════════════════════════════════════════════════
// SvgContext
// ═══════════════════════════════════════════════════════════════════════

pub struct SvgContext {
    elements: Vec<String>,
    width: f64,
    height: f64,
    /// Top line of the stave being drawn on
    staff_top: f64,
}

impl SvgContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            staff_top: STAFF_TOP,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="font-family: 'Georgia', 'Times New Roman', serif;">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    // ── Primitives ──────────────────────────────────────────────────

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    fn text(&mut self, x: f64, y: f64, content: &str, size: f64, fill: &str) {
        let escaped = content
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.0}" fill="{}" text-anchor="start">{}</text>"#,
            x, y, size, fill, escaped
        ));
    }

    fn notehead(&mut self, cx: f64, cy: f64, filled: bool) {
        if filled {
            self.elements.push(format!(
                r#"<ellipse cx="{:.1}" cy="{:.1}" rx="{:.1}" ry="{:.1}" fill="{}" stroke="none" transform="rotate(-15,{:.1},{:.1})"/>"#,
                cx, cy, NOTEHEAD_RX, NOTEHEAD_RY, NOTE_COLOR, cx, cy
            ));
        } else {
            let sw = 1.5;
            self.elements.push(format!(
                r#"<ellipse cx="{:.1}" cy="{:.1}" rx="{:.1}" ry="{:.1}" fill="none" stroke="{}" stroke-width="{:.1}" transform="rotate(-15,{:.1},{:.1})"/>"#,
                cx, cy, NOTEHEAD_RX - sw / 2.0, NOTEHEAD_RY - sw / 2.0, NOTE_COLOR, sw, cx, cy
            ));
        }
    }

    // ── Staff ───────────────────────────────────────────────────────

    /// Draw the five staff lines and the furniture of `stave`, and make it
    /// the stave later noteheads are placed on.
    pub fn draw_stave(&mut self, stave: &Stave) {
        self.staff_top = stave.y;
        for i in 0..5 {
            let y = stave.line_y(i);
            self.line(stave.x, y, stave.x + stave.width, y, STAFF_COLOR, STAFF_LINE_WIDTH);
        }

        let mut x = stave.x + stave.padding_left;
        if stave.clef {
            self.text(x, stave.bottom_y() - STAFF_LINE_SPACING / 2.0, "\u{1D11E}", STAFF_HEIGHT, NOTE_COLOR);
            x += CLEF_SPACE;
        }
        if let Some(key) = &stave.key {
            let (glyph, step) = if key.fifths > 0 {
                ("\u{266F}", KEY_SIG_SHARP_SPACE)
            } else {
                ("\u{266D}", KEY_SIG_FLAT_SPACE)
            };
            for _ in 0..key.accidental_count() {
                self.text(x, self.staff_top + STAFF_LINE_SPACING * 1.5, glyph, STAFF_LINE_SPACING * 2.0, NOTE_COLOR);
                x += step;
            }
        }
        if let Some(time) = stave.time {
            let size = STAFF_HEIGHT / 2.0;
            self.text(x, self.staff_top + STAFF_HEIGHT / 2.0, &time.num_beats.to_string(), size, NOTE_COLOR);
            self.text(x, self.staff_top + STAFF_HEIGHT, &time.beat_value.to_string(), size, NOTE_COLOR);
        }
    }

    /// y of a pitch on the current treble stave.
    fn pitch_y(&self, pitch: &Pitch) -> f64 {
        let step = pitch.octave * 7 + pitch.letter.index() as i32;
        let bottom = self.staff_top + STAFF_HEIGHT;
        bottom - (step - BOTTOM_LINE_STEP) as f64 * STAFF_LINE_SPACING / 2.0
    }

    fn draw_note(&mut self, tickable: &Tickable, pitches: &[Pitch], x: f64) {
        let base_ticks = tickable.duration.as_ref().map_or(RESOLUTION / 4, |d| d.base_ticks);
        let filled = base_ticks < RESOLUTION / 2;
        let cx = x + NOTEHEAD_RX;

        let mut top = f64::INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        for (i, pitch) in pitches.iter().enumerate() {
            let cy = self.pitch_y(pitch);
            top = top.min(cy);
            bottom = bottom.max(cy);
            self.notehead(cx, cy, filled);

            if let Some(Some(alteration)) = tickable.accidentals().get(i) {
                let ax = x - ACCIDENTAL_GAP - KEY_SIG_SHARP_SPACE;
                self.text(ax, cy + NOTEHEAD_RY, accidental_glyph(*alteration), STAFF_LINE_SPACING * 2.0, NOTE_COLOR);
            }
            for d in 0..tickable.dots() {
                let dx = cx + NOTEHEAD_RX + DOT_SPACING * (d as f64 + 0.5);
                self.elements.push(format!(
                    r#"<circle cx="{:.1}" cy="{:.1}" r="1.2" fill="{}"/>"#,
                    dx, cy - 1.0, NOTE_COLOR
                ));
            }
        }

        if base_ticks < RESOLUTION && top.is_finite() {
            let sx = cx + NOTEHEAD_RX - STEM_WIDTH / 2.0;
            self.line(sx, bottom, sx, top - STEM_LENGTH, NOTE_COLOR, STEM_WIDTH);
        }
    }
}

fn accidental_glyph(alteration: Alteration) -> &'static str {
    match alteration {
        Alteration::Sharp => "\u{266F}",
        Alteration::Flat => "\u{266D}",
        Alteration::Natural => "\u{266E}",
        Alteration::DoubleSharp => "\u{1D12A}",
        Alteration::DoubleFlat => "\u{1D12B}",
        other => other.code(),
    }
}

impl DrawContext for SvgContext {
    fn draw_tickable(&mut self, tickable: &Tickable, x: f64) {
        match &tickable.kind {
            TickableKind::Note { pitches } => self.draw_note(tickable, pitches, x),
            TickableKind::Rest => {
                let y = self.staff_top + STAFF_HEIGHT / 2.0;
                self.elements.push(format!(
                    r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                    x,
                    y - STAFF_LINE_SPACING / 4.0,
                    REST_WIDTH,
                    STAFF_LINE_SPACING / 2.0,
                    REST_COLOR
                ));
            }
            TickableKind::BarLine => self.draw_bar_line(x),
            TickableKind::Marker { label } => {
                let y = self.staff_top - STAFF_LINE_SPACING / 2.0;
                self.text(x, y, label, TEXT_CHAR_WIDTH * 1.5, NOTE_COLOR);
            }
        }
    }

    fn draw_bar_line(&mut self, x: f64) {
        let top = self.staff_top;
        self.line(x, top, x, top + STAFF_HEIGHT, BARLINE_COLOR, BARLINE_WIDTH);
    }
}
