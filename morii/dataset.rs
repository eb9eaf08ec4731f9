//! Day-by-day café head counts

/// Age group of a visitor
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Young,
    Middle,
    Older,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Young, Category::Middle, Category::Older];

    /// Stain colour for this group
    pub fn color(self) -> Hsb {
        match self {
            Category::Young => Hsb::new(25.0, 75.0, 65.0),
            Category::Middle => Hsb::new(45.0, 60.0, 55.0),
            Category::Older => Hsb::new(200.0, 55.0, 60.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Young => "young",
            Category::Middle => "middle",
            Category::Older => "older",
        }
    }
}

/// Hue in degrees, saturation and brightness in percent
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hsb {
    pub h: f32,
    pub s: f32,
    pub b: f32,
}

impl Hsb {
    pub const fn new(h: f32, s: f32, b: f32) -> Self {
        Self { h, s, b }
    }

    /// Scale saturation and brightness, keeping them in 0..=100
    pub fn shade(self, saturation: f32, brightness: f32) -> Self {
        Self {
            h: self.h,
            s: (self.s * saturation).clamp(0.0, 100.0),
            b: (self.b * brightness).clamp(0.0, 100.0),
        }
    }
}

/// One observed day. `start_count`/`end_count` are shown to the viewer only;
/// the simulation is sized by the three category counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DayRecord {
    pub day: u32,
    pub time_range: &'static str,
    pub start_count: u32,
    pub end_count: u32,
    pub young: u32,
    pub middle: u32,
    pub older: u32,
}

impl DayRecord {
    pub fn count(&self, category: Category) -> u32 {
        match category {
            Category::Young => self.young,
            Category::Middle => self.middle,
            Category::Older => self.older,
        }
    }

    /// Number of stains the day produces
    pub fn population(&self) -> u32 {
        self.young + self.middle + self.older
    }
}

/// Most people the café has held at once
pub const MAX_CAPACITY: usize = 50;

pub const DAYS: [DayRecord; 4] = [
    DayRecord {
        day: 1,
        time_range: "12-2",
        start_count: 37,
        end_count: 40,
        young: 15,
        middle: 10,
        older: 8,
    },
    DayRecord {
        day: 2,
        time_range: "11-12",
        start_count: 15,
        end_count: 36,
        young: 15,
        middle: 10,
        older: 8,
    },
    DayRecord {
        day: 3,
        time_range: "4-6",
        start_count: 30,
        end_count: 25,
        young: 11,
        middle: 10,
        older: 4,
    },
    DayRecord {
        day: 4,
        time_range: "9-10",
        start_count: 37,
        end_count: 40,
        young: 9,
        middle: 5,
        older: 3,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populations_fit_capacity() {
        for day in &DAYS {
            assert!(day.population() as usize <= MAX_CAPACITY);
            let by_category: u32 = Category::ALL.iter().map(|&c| day.count(c)).sum();
            assert_eq!(by_category, day.population());
        }
        assert_eq!(DAYS[0].population(), 33);
    }

    #[test]
    fn shade_clamps() {
        let c = Category::Young.color().shade(0.4, 1.2);
        assert!((c.s - 30.0).abs() < 1e-4);
        assert!((c.b - 78.0).abs() < 1e-4);
        let bright = Hsb::new(0.0, 90.0, 95.0).shade(2.0, 2.0);
        assert_eq!(bright.s, 100.0);
        assert_eq!(bright.b, 100.0);
    }
}
