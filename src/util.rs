pub mod color {
    use std::borrow::Cow;

    use crate::scene::Color;

    /// Human-readable name for debug output. Alpha is ignored for the named
    /// colors.
    pub fn name(color: Color) -> Cow<'static, str> {
        match (color.r, color.g, color.b) {
            (255, 0, 0) => "RED".into(),
            (0, 255, 0) => "GREEN".into(),
            (0, 0, 255) => "BLUE".into(),
            (255, 255, 255) => "WHITE".into(),
            (0, 0, 0) => "BLACK".into(),
            (255, 255, 0) => "YELLOW".into(),
            _ => format!("RGBA({},{},{},{})", color.r, color.g, color.b, color.a).into(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn named_colors() {
            assert_eq!(name(Color::RED), "RED");
            assert_eq!(name(Color::YELLOW), "YELLOW");
            assert_eq!(name(Color::new(0, 0, 0, 10)), "BLACK");
        }

        #[test]
        fn other_colors_print_channels() {
            assert_eq!(name(Color::new(255, 128, 0, 255)), "RGBA(255,128,0,255)");
        }
    }
}
