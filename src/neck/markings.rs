//! Inlay dots and fret numbering drawn on the static neck.

pub const SINGLE_INLAY_FRETS: [usize; 8] = [3, 5, 7, 9, 15, 17, 19, 21];
pub const DOUBLE_INLAY_FRETS: [usize; 2] = [12, 24];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inlay {
    Single,
    Double,
}

pub fn inlay_at(fret: usize) -> Option<Inlay> {
    if SINGLE_INLAY_FRETS.contains(&fret) {
        Some(Inlay::Single)
    } else if DOUBLE_INLAY_FRETS.contains(&fret) {
        Some(Inlay::Double)
    } else {
        None
    }
}

/// Inlays on frets `1..=visible_fret_count`, in fret order.
pub fn visible_inlays(visible_fret_count: usize) -> Vec<(usize, Inlay)> {
    (1..=visible_fret_count)
        .filter_map(|fret| inlay_at(fret).map(|inlay| (fret, inlay)))
        .collect()
}

const NUMERALS: [(usize, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Roman numeral for `n`; zero has no numeral and yields an empty string.
pub fn romanize(mut n: usize) -> String {
    let mut out = String::new();
    for &(value, numeral) in &NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
