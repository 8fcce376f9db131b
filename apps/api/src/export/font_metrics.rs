//! Static glyph-width tables for the PDF base-14 Helvetica family.
//!
//! Widths are in em units (AFM widths / 1000) and cover ASCII 0x20..=0x7E.
//! Index = (char as usize) - 32. Oblique shares the regular widths.
//! Anything outside ASCII falls back to `average_char_width`, which is close
//! enough for the accented Latin letters WinAnsi can carry.

// ────────────────────────────────────────────────────────────────────────────
// Fonts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdfFont {
    Regular,
    Bold,
    Oblique,
}

impl PdfFont {
    pub const ALL: [PdfFont; 3] = [PdfFont::Regular, PdfFont::Bold, PdfFont::Oblique];

    /// Name of the font in the page's resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            PdfFont::Regular => "F1",
            PdfFont::Bold => "F2",
            PdfFont::Oblique => "F3",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            PdfFont::Regular => "Helvetica",
            PdfFont::Bold => "Helvetica-Bold",
            PdfFont::Oblique => "Helvetica-Oblique",
        }
    }

    pub fn metrics(&self) -> &'static FontMetricTable {
        match self {
            PdfFont::Regular | PdfFont::Oblique => &HELVETICA_TABLE,
            PdfFont::Bold => &HELVETICA_BOLD_TABLE,
        }
    }

    /// Rendered width of `s` in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.metrics().measure_str(s) * size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.measure_char(c)).sum()
    }

    fn measure_char(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Greedy word wrap of one paragraph to `max_width_pt` at `size_pt`.
    ///
    /// Whitespace runs collapse to single spaces. A word wider than the line
    /// starts a fresh line and is broken between characters, the way
    /// `overflow-wrap: break-word` does in the preview.
    pub fn wrap(&self, s: &str, max_width_pt: f32, size_pt: f32) -> Vec<String> {
        let max_width = max_width_pt / size_pt;
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in s.split_whitespace() {
            let word_w = self.measure_str(word);
            if word_w > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current_width = 0.0;
                for c in word.chars() {
                    let char_w = self.measure_char(c);
                    if !current.is_empty() && current_width + char_w > max_width {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += char_w;
                }
            } else if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + self.space_width + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += self.space_width + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.54,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.58,
    space_width: 0.278,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        let regular = PdfFont::Regular.metrics();
        assert!((regular.measure_str("A") - 0.667).abs() < 1e-6);
        assert!((regular.measure_str("il") - 0.444).abs() < 1e-6);
        assert!((PdfFont::Bold.width_pt("m", 10.0) - 8.89).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_not_narrower_than_regular() {
        let text = "Architected a distributed caching layer";
        assert!(PdfFont::Bold.width_pt(text, 10.0) >= PdfFont::Regular.width_pt(text, 10.0));
    }

    #[test]
    fn test_oblique_shares_regular_metrics() {
        assert!(std::ptr::eq(PdfFont::Oblique.metrics(), PdfFont::Regular.metrics()));
    }

    #[test]
    fn test_non_ascii_uses_average() {
        let regular = PdfFont::Regular.metrics();
        assert!((regular.measure_str("é") - regular.average_char_width).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = PdfFont::Regular.metrics().wrap("Rust   engineer", 200.0, 8.0);
        assert_eq!(lines, vec!["Rust engineer"]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let metrics = PdfFont::Regular.metrics();
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load";
        let lines = metrics.wrap(text, 150.0, 8.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(PdfFont::Regular.width_pt(line, 8.0) <= 150.0, "{line:?} overflows");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let metrics = PdfFont::Regular.metrics();
        let url = "https://www.linkedin.com/in/jane-doe-engineer";
        let lines = metrics.wrap(url, 141.0, 7.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(PdfFont::Regular.width_pt(line, 7.0) <= 141.0, "{line:?} overflows");
        }
        assert_eq!(lines.concat(), url);
    }

    #[test]
    fn test_wrap_overlong_word_starts_fresh_line() {
        let lines = PdfFont::Regular.metrics().wrap("a supercalifragilistic b", 20.0, 8.0);
        assert_eq!(lines.first().map(String::as_str), Some("a"));
        assert!(lines[1].starts_with("sup"));
        assert_eq!(lines.concat().replace(' ', ""), "asupercalifragilisticb");
        for line in &lines {
            assert!(PdfFont::Regular.width_pt(line, 8.0) <= 20.0, "{line:?} overflows");
        }
    }

    #[test]
    fn test_wrap_blank_is_empty() {
        assert!(PdfFont::Regular.metrics().wrap("   ", 100.0, 8.0).is_empty());
    }
}
