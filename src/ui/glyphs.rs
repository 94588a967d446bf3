/// Characters used to draw the heatmap.
#[derive(Clone, Copy, Debug)]
pub struct Glyphs {
    /// Shade ramp from lowest to highest frequency
    pub shades: [&'static str; 5],
    /// Placeholder for cells whose codon does not encode the row's amino acid
    pub empty_cell: &'static str,
    pub h_separator: &'static str,
    pub arrow_left: &'static str,
    pub arrow_right: &'static str,
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

impl Glyphs {
    /// Shade glyph for a frequency in [0, 1].
    pub fn shade(&self, frequency: f64) -> &'static str {
        let last = self.shades.len() - 1;
        let idx = (frequency.clamp(0.0, 1.0) * last as f64).round() as usize;
        self.shades[idx.min(last)]
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        shades: [" ", ".", ":", "+", "#"],
        empty_cell: ".",
        h_separator: "-",
        arrow_left: "<",
        arrow_right: ">",
    }
}

fn fancy() -> Glyphs {
    Glyphs {
        shades: [" ", "░", "▒", "▓", "█"],
        empty_cell: "·",
        h_separator: "─",
        arrow_left: "←",
        arrow_right: "→",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_ramp() {
        let glyphs = select(false);
        assert_eq!(glyphs.shade(0.0), " ");
        assert_eq!(glyphs.shade(0.5), ":");
        assert_eq!(glyphs.shade(1.0), "#");
        assert_eq!(glyphs.shade(7.0), "#");
        assert_eq!(select(true).shade(1.0), "█");
    }
}
