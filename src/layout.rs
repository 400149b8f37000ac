//! Table-driven German word-clock layout.
//!
//! The face is an 11 x 13 letter matrix. Rows 0-9 carry the classic layout
//! (ES IST ... UHR), rows 10-12 carry the single-minute correction words
//! (PLUS EINS/ZWEI/DREI/VIER MINUTE(N)). Every lexical word is one
//! horizontal run of cells, described by the entry of [`WORD_LAYOUT`] at the
//! word's enum index.
//!
//! Phrase selection is fully table-driven: a minute table picks up to three
//! words per five-minute bucket, an hour table names the hour word, and an
//! extra-minutes table appends the "+N minute(s)" correction. The two
//! selectable modes differ only in their minute-table rows.

/// Columns of the letter matrix.
pub const MATRIX_WIDTH: u16 = 11;
/// Rows of the letter matrix.
pub const MATRIX_HEIGHT: u16 = 13;

/// Words per minute-table or extra-minutes entry.
pub const WORDS_PER_MINUTE_ENTRY: usize = 3;
/// Words per hour-table entry.
pub const WORDS_PER_HOUR_ENTRY: usize = 2;

/// Regional phrasing variant.
///
/// `Wessi` says "viertel nach" / "viertel vor"; `RheinRuhr` says "viertel" /
/// "dreiviertel" with the hour advanced, and phrases twenty past/to the hour
/// around "halb".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockMode {
    Wessi = 0,
    #[default]
    RheinRuhr = 1,
}

impl ClockMode {
    /// Mode for a persisted setting value; out-of-range values fall back to
    /// the default.
    pub fn from_setting(value: u8) -> Self {
        match value {
            0 => Self::Wessi,
            1 => Self::RheinRuhr,
            _ => Self::default(),
        }
    }
}

/// Which hour-word column a minute bucket selects.
///
/// German needs the truncated "EIN" next to "UHR" ("ein Uhr") but "EINS"
/// everywhere else; all other hours are identical between the columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HourMode {
    /// The bare hour form used together with "UHR".
    Singular = 0,
    /// The standalone hour form.
    Standard = 1,
}

/// The lexical words of the face. Entry 0 is the reserved end marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Word {
    End = 0,
    It,            // ES
    Is,            // IST
    MinFive,       // FUENF (minute)
    MinTen,        // ZEHN (minute)
    MinTwenty,     // ZWANZIG
    Quarter,       // VIERTEL
    ThreeQuarters, // DREIVIERTEL
    Before,        // VOR
    After,         // NACH
    Half,          // HALB
    OClock,        // UHR
    Twelve,        // ZWOELF
    One,           // EINS
    OneSingular,   // EIN
    Two,           // ZWEI
    Three,         // DREI
    Four,          // VIER
    Five,          // FUENF (hour)
    Six,           // SECHS
    Seven,         // SIEBEN
    Eight,         // ACHT
    Nine,          // NEUN
    Ten,           // ZEHN (hour)
    Eleven,        // ELF
    Plus,          // PLUS
    ExtraOne,      // EINS (correction)
    ExtraTwo,      // ZWEI (correction)
    ExtraThree,    // DREI (correction)
    ExtraFour,     // VIER (correction)
    MinuteSingular, // MINUTE
    MinutesPlural, // MINUTEN
}

/// Number of entries in [`WORD_LAYOUT`].
pub const WORD_COUNT: usize = 32;

/// One word's horizontal run of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordPosition {
    /// Matrix row.
    pub row: u16,
    /// First column of the run.
    pub column: u16,
    /// Run length in cells; 0 for the end marker.
    pub length: u16,
}

const fn at(row: u16, column: u16, length: u16) -> WordPosition {
    WordPosition { row, column, length }
}

/// Cell runs indexed by [`Word`] discriminant.
pub const WORD_LAYOUT: [WordPosition; WORD_COUNT] = [
    at(0, 0, 0),  // End
    at(0, 0, 2),  // ES
    at(0, 3, 3),  // IST
    at(0, 7, 4),  // FUENF (minute)
    at(1, 0, 4),  // ZEHN (minute)
    at(1, 4, 7),  // ZWANZIG
    at(2, 4, 7),  // VIERTEL
    at(2, 0, 11), // DREIVIERTEL
    at(3, 0, 3),  // VOR
    at(3, 7, 4),  // NACH
    at(4, 0, 4),  // HALB
    at(9, 8, 3),  // UHR
    at(8, 6, 5),  // ZWOELF
    at(5, 0, 4),  // EINS
    at(5, 0, 3),  // EIN
    at(5, 7, 4),  // ZWEI
    at(6, 0, 4),  // DREI
    at(6, 7, 4),  // VIER
    at(4, 7, 4),  // FUENF (hour)
    at(7, 0, 5),  // SECHS
    at(8, 0, 6),  // SIEBEN
    at(7, 7, 4),  // ACHT
    at(9, 3, 4),  // NEUN
    at(9, 0, 4),  // ZEHN (hour)
    at(4, 5, 3),  // ELF
    at(10, 0, 4), // PLUS
    at(10, 5, 4), // EINS (correction)
    at(11, 0, 4), // ZWEI (correction)
    at(11, 4, 4), // DREI (correction)
    at(12, 0, 4), // VIER (correction)
    at(12, 4, 6), // MINUTE
    at(12, 4, 7), // MINUTEN
];

/// One five-minute bucket's phrasing.
#[derive(Clone, Copy, Debug)]
pub struct MinuteEntry {
    /// Hour-word column this bucket reads.
    pub hour_mode: HourMode,
    /// Whether the displayed hour is the next one ("N before ...").
    pub advance_hour: bool,
    /// Words lit for this bucket, end-marker padded.
    pub words: [Word; WORDS_PER_MINUTE_ENTRY],
}

const fn bucket(
    hour_mode: HourMode,
    advance_hour: bool,
    words: [Word; WORDS_PER_MINUTE_ENTRY],
) -> MinuteEntry {
    MinuteEntry { hour_mode, advance_hour, words }
}

/// Minute phrasing per mode and five-minute bucket.
pub const MINUTE_TABLE: [[MinuteEntry; 12]; 2] = [
    // Wessi
    [
        bucket(HourMode::Singular, false, [Word::OClock, Word::End, Word::End]),
        bucket(HourMode::Standard, false, [Word::MinFive, Word::After, Word::End]),
        bucket(HourMode::Standard, false, [Word::MinTen, Word::After, Word::End]),
        bucket(HourMode::Standard, false, [Word::Quarter, Word::After, Word::End]),
        bucket(HourMode::Standard, false, [Word::MinTwenty, Word::After, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinFive, Word::Before, Word::Half]),
        bucket(HourMode::Standard, true, [Word::Half, Word::End, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinFive, Word::After, Word::Half]),
        bucket(HourMode::Standard, true, [Word::MinTwenty, Word::Before, Word::End]),
        bucket(HourMode::Standard, true, [Word::Quarter, Word::Before, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinTen, Word::Before, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinFive, Word::Before, Word::End]),
    ],
    // Rhein-Ruhr
    [
        bucket(HourMode::Singular, false, [Word::OClock, Word::End, Word::End]),
        bucket(HourMode::Standard, false, [Word::MinFive, Word::After, Word::End]),
        bucket(HourMode::Standard, false, [Word::MinTen, Word::After, Word::End]),
        bucket(HourMode::Standard, true, [Word::Quarter, Word::End, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinTen, Word::Before, Word::Half]),
        bucket(HourMode::Standard, true, [Word::MinFive, Word::Before, Word::Half]),
        bucket(HourMode::Standard, true, [Word::Half, Word::End, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinFive, Word::After, Word::Half]),
        bucket(HourMode::Standard, true, [Word::MinTen, Word::After, Word::Half]),
        bucket(HourMode::Standard, true, [Word::ThreeQuarters, Word::End, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinTen, Word::Before, Word::End]),
        bucket(HourMode::Standard, true, [Word::MinFive, Word::Before, Word::End]),
    ],
];

/// Hour words per [`HourMode`] and 12-hour index; index 0 is twelve.
pub const HOUR_TABLE: [[[Word; WORDS_PER_HOUR_ENTRY]; 12]; 2] = [
    // Singular (used with "UHR")
    [
        [Word::Twelve, Word::End],
        [Word::OneSingular, Word::End],
        [Word::Two, Word::End],
        [Word::Three, Word::End],
        [Word::Four, Word::End],
        [Word::Five, Word::End],
        [Word::Six, Word::End],
        [Word::Seven, Word::End],
        [Word::Eight, Word::End],
        [Word::Nine, Word::End],
        [Word::Ten, Word::End],
        [Word::Eleven, Word::End],
    ],
    // Standard
    [
        [Word::Twelve, Word::End],
        [Word::One, Word::End],
        [Word::Two, Word::End],
        [Word::Three, Word::End],
        [Word::Four, Word::End],
        [Word::Five, Word::End],
        [Word::Six, Word::End],
        [Word::Seven, Word::End],
        [Word::Eight, Word::End],
        [Word::Nine, Word::End],
        [Word::Ten, Word::End],
        [Word::Eleven, Word::End],
    ],
];

/// "+N minute(s)" correction words per extra-minute count 0-4.
pub const EXTRA_MINUTES_TABLE: [[Word; WORDS_PER_MINUTE_ENTRY]; 5] = [
    [Word::End, Word::End, Word::End],
    [Word::Plus, Word::ExtraOne, Word::MinuteSingular],
    [Word::Plus, Word::ExtraTwo, Word::MinutesPlural],
    [Word::Plus, Word::ExtraThree, Word::MinutesPlural],
    [Word::Plus, Word::ExtraFour, Word::MinutesPlural],
];
