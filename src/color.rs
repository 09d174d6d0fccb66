use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::data::model::{Dataset, FieldValue};

/// 8-bit sRGB colour shared by the SVG writer and the egui painter.
pub type Rgb = Srgb<u8>;

/// `#rrggbb` for SVG attributes.
pub fn to_hex(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// D3's `schemeCategory10`.
pub const CATEGORY10: [Rgb; 10] = [
    Srgb::new(0x1f, 0x77, 0xb4),
    Srgb::new(0xff, 0x7f, 0x0e),
    Srgb::new(0x2c, 0xa0, 0x2c),
    Srgb::new(0xd6, 0x27, 0x28),
    Srgb::new(0x94, 0x67, 0xbd),
    Srgb::new(0x8c, 0x56, 0x4b),
    Srgb::new(0xe3, 0x77, 0xc2),
    Srgb::new(0x7f, 0x7f, 0x7f),
    Srgb::new(0xbc, 0xbd, 0x22),
    Srgb::new(0x17, 0xbe, 0xcf),
];

/// Fallback for values that were not seen when the map was built.
pub const UNKNOWN_COLOR: Rgb = Srgb::new(0xa0, 0xa0, 0xa0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Ten fixed colours, cycling after the tenth category.
    #[default]
    Category10,
    /// One evenly spaced hue per category.
    Spectrum,
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format::<u8>()
        })
        .collect()
}

impl ColorScheme {
    fn colors(self, n: usize) -> Vec<Rgb> {
        match self {
            ColorScheme::Category10 => CATEGORY10.iter().copied().cycle().take(n).collect(),
            ColorScheme::Spectrum => generate_palette(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Rgb
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category column to colours, assigned in the
/// order the values first appear in the dataset.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    order: Vec<FieldValue>,
    mapping: BTreeMap<FieldValue, Rgb>,
}

impl ColorMap {
    /// Build a colour map for `column` by scanning rows in order.
    pub fn from_dataset(dataset: &Dataset, column: &str, scheme: ColorScheme) -> Self {
        let mut order: Vec<FieldValue> = Vec::new();
        for row in &dataset.rows {
            let value = row.get(column).cloned().unwrap_or(FieldValue::Null);
            if !order.contains(&value) {
                order.push(value);
            }
        }

        let mapping = order
            .iter()
            .cloned()
            .zip(scheme.colors(order.len()))
            .collect();

        ColorMap {
            column: column.to_string(),
            order,
            mapping,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &FieldValue) -> Rgb {
        self.mapping.get(value).copied().unwrap_or(UNKNOWN_COLOR)
    }

    /// Colour of a row's category value (missing counts as null).
    pub fn color_for_row(&self, row: &crate::data::model::Row) -> Rgb {
        self.color_for(row.get(&self.column).unwrap_or(&FieldValue::Null))
    }

    /// Return the legend entries (value label → colour) in first-seen order.
    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        self.order
            .iter()
            .map(|v| (v.to_string(), self.color_for(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn species_dataset(names: &[&str]) -> Dataset {
        let rows = names
            .iter()
            .map(|s| [("species", FieldValue::String(s.to_string()))].into_iter().collect::<Row>())
            .collect();
        Dataset::with_columns(vec!["species".into()], rows)
    }

    #[test]
    fn colours_follow_first_seen_order() {
        let ds = species_dataset(&["virginica", "setosa", "virginica", "versicolor"]);
        let cm = ColorMap::from_dataset(&ds, "species", ColorScheme::Category10);
        let legend: Vec<String> = cm.legend_entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(legend, vec!["virginica", "setosa", "versicolor"]);
        assert_eq!(cm.color_for(&FieldValue::String("virginica".into())), CATEGORY10[0]);
        assert_eq!(cm.color_for(&FieldValue::String("setosa".into())), CATEGORY10[1]);
        assert_eq!(cm.color_for(&FieldValue::String("versicolor".into())), CATEGORY10[2]);
    }

    #[test]
    fn category10_cycles_after_ten() {
        let names: Vec<String> = (0..12).map(|i| format!("s{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let cm = ColorMap::from_dataset(&species_dataset(&refs), "species", ColorScheme::Category10);
        assert_eq!(cm.color_for(&FieldValue::String("s10".into())), CATEGORY10[0]);
    }

    #[test]
    fn spectrum_gives_distinct_colours() {
        let cm = ColorMap::from_dataset(
            &species_dataset(&["a", "b", "c"]),
            "species",
            ColorScheme::Spectrum,
        );
        let colours: Vec<Rgb> = cm.legend_entries().into_iter().map(|(_, c)| c).collect();
        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
    }

    #[test]
    fn unknown_value_is_gray() {
        let cm = ColorMap::from_dataset(&species_dataset(&["a"]), "species", ColorScheme::Category10);
        assert_eq!(cm.color_for(&FieldValue::String("zzz".into())), UNKNOWN_COLOR);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex(CATEGORY10[0]), "#1f77b4");
    }
}
