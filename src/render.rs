//! Time-to-mask rendering.
//!
//! [`render_time`] turns an hour/minute pair into the illumination mask the
//! display subsystem colors and pushes to the strip. The function is pure:
//! same inputs and configuration, same mask.

use heapless::Vec;

use crate::bit_matrix::BitMatrix;
use crate::layout::{
    ClockMode, EXTRA_MINUTES_TABLE, HOUR_TABLE, MATRIX_HEIGHT, MATRIX_WIDTH, MINUTE_TABLE,
    WORD_COUNT, WORD_LAYOUT, Word,
};

/// Most words one render can light: lead-in (2) + minute (3) + hour (2) +
/// extra minutes (3).
const MAX_WORDS_PER_RENDER: usize = 10;

/// Rendering configuration, derived from the persisted display settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderConfig {
    /// Regional phrasing variant.
    pub mode: ClockMode,
    /// Light the "ES IST" lead-in.
    pub show_it_is: bool,
    /// Light the "+N minute(s)" correction words.
    pub show_single_minutes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: ClockMode::default(),
            show_it_is: true,
            show_single_minutes: true,
        }
    }
}

/// Render `hour`/`minute` into a fresh illumination mask.
///
/// Out-of-range inputs yield the all-clear mask. The returned mask already
/// carries the serpentine wiring transform: every even-indexed row is bit
/// reversed to match the strip's electrical order.
pub fn render_time(hour: u8, minute: u8, config: &RenderConfig) -> BitMatrix {
    let mut mask = BitMatrix::new(MATRIX_WIDTH, MATRIX_HEIGHT);
    if hour > 23 || minute > 59 {
        warn!("render: out of range time {}:{}, blanking", hour, minute);
        return mask;
    }

    let minute_bucket = usize::from(minute / 5);
    let extra_minutes = usize::from(minute % 5);
    let entry = &MINUTE_TABLE[config.mode as usize][minute_bucket];

    let mut display_hour = u16::from(hour);
    if entry.advance_hour {
        display_hour += 1;
    }
    // Normalize into the 12-hour domain; index 0 is twelve.
    while display_hour > 12 {
        display_hour -= 12;
    }
    if display_hour == 12 {
        display_hour = 0;
    }

    let mut words: Vec<Word, MAX_WORDS_PER_RENDER> = Vec::new();
    if config.show_it_is {
        let _ = words.push(Word::It);
        let _ = words.push(Word::Is);
    }
    for &word in &entry.words {
        if word != Word::End {
            let _ = words.push(word);
        }
    }
    for &word in &HOUR_TABLE[entry.hour_mode as usize][usize::from(display_hour)] {
        if word != Word::End {
            let _ = words.push(word);
        }
    }
    if config.show_single_minutes {
        for &word in &EXTRA_MINUTES_TABLE[extra_minutes] {
            if word != Word::End {
                let _ = words.push(word);
            }
        }
    }

    for &word in &words {
        paint_word(&mut mask, word);
    }

    // Serpentine strip: even rows run in reverse electrical order.
    for row in (0..MATRIX_HEIGHT).step_by(2) {
        mask.flip_row(row);
    }
    mask
}

/// Light one word's cell run. Indices outside the layout table are skipped,
/// guarding against malformed table data.
fn paint_word(mask: &mut BitMatrix, word: Word) {
    let index = word as usize;
    if index == Word::End as usize || index >= WORD_COUNT {
        return;
    }
    let position = WORD_LAYOUT[index];
    mask.set_line(position.row, position.column, position.length);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::WordPosition;

    fn word_is_lit(mask: &BitMatrix, word: Word) -> bool {
        let WordPosition { row, column, length } = WORD_LAYOUT[word as usize];
        // Undo the serpentine transform for even rows.
        (0..length).all(|offset| {
            let col = if row % 2 == 0 {
                MATRIX_WIDTH - 1 - (column + offset)
            } else {
                column + offset
            };
            mask.is_bit_at(row, col)
        })
    }

    fn lit_count(mask: &BitMatrix) -> u32 {
        (0..mask.size()).filter(|&index| mask.is_bit(index)).count() as u32
    }

    fn expected_cells(words: &[Word]) -> u32 {
        words
            .iter()
            .map(|&word| u32::from(WORD_LAYOUT[word as usize].length))
            .sum()
    }

    #[test]
    fn full_hour_lights_only_hour_and_o_clock() {
        let config = RenderConfig {
            mode: ClockMode::RheinRuhr,
            show_it_is: false,
            show_single_minutes: true,
        };
        let mask = render_time(15, 0, &config);
        assert!(word_is_lit(&mask, Word::Three));
        assert!(word_is_lit(&mask, Word::OClock));
        assert_eq!(lit_count(&mask), expected_cells(&[Word::Three, Word::OClock]));
    }

    #[test]
    fn one_o_clock_uses_the_singular_hour_word() {
        let config = RenderConfig {
            mode: ClockMode::Wessi,
            show_it_is: false,
            show_single_minutes: false,
        };
        let mask = render_time(13, 0, &config);
        assert_eq!(
            lit_count(&mask),
            expected_cells(&[Word::OneSingular, Word::OClock])
        );
        // EIN, not EINS: the fourth cell of the run stays dark. The run sits
        // on an odd row, so no serpentine flip applies.
        let eins = WORD_LAYOUT[Word::One as usize];
        assert!(!mask.is_bit_at(eins.row, eins.column + eins.length - 1));
    }

    #[test]
    fn twenty_five_past_phrases_around_half() {
        let config = RenderConfig {
            mode: ClockMode::RheinRuhr,
            show_it_is: true,
            show_single_minutes: true,
        };
        let mask = render_time(10, 25, &config);
        for word in [Word::It, Word::Is, Word::MinFive, Word::Before, Word::Half] {
            assert!(word_is_lit(&mask, word), "{:?} should be lit", word);
        }
        // Hour advanced to eleven.
        assert!(word_is_lit(&mask, Word::Eleven));
        assert!(!word_is_lit(&mask, Word::OClock));
    }

    #[test]
    fn extra_minutes_follow_the_single_minutes_flag() {
        let mut config = RenderConfig {
            mode: ClockMode::RheinRuhr,
            show_it_is: false,
            show_single_minutes: true,
        };
        let with_extra = render_time(9, 47, &config);
        for word in [Word::ThreeQuarters, Word::Ten, Word::Plus, Word::ExtraTwo, Word::MinutesPlural]
        {
            assert!(word_is_lit(&with_extra, word), "{:?} should be lit", word);
        }

        config.show_single_minutes = false;
        let without_extra = render_time(9, 47, &config);
        assert!(!word_is_lit(&without_extra, Word::Plus));
        assert!(!word_is_lit(&without_extra, Word::ExtraTwo));
        assert_eq!(
            lit_count(&without_extra),
            expected_cells(&[Word::ThreeQuarters, Word::Ten])
        );
    }

    #[test]
    fn wessi_quarter_to_keeps_vor_phrasing() {
        let config = RenderConfig {
            mode: ClockMode::Wessi,
            show_it_is: false,
            show_single_minutes: false,
        };
        let mask = render_time(9, 45, &config);
        for word in [Word::Quarter, Word::Before, Word::Ten] {
            assert!(word_is_lit(&mask, word), "{:?} should be lit", word);
        }
    }

    #[test]
    fn midnight_normalizes_to_twelve() {
        let config = RenderConfig {
            mode: ClockMode::RheinRuhr,
            show_it_is: false,
            show_single_minutes: false,
        };
        let mask = render_time(0, 0, &config);
        assert!(word_is_lit(&mask, Word::Twelve));
        assert!(word_is_lit(&mask, Word::OClock));
    }

    #[test]
    fn out_of_range_inputs_blank_the_mask() {
        let config = RenderConfig::default();
        assert_eq!(lit_count(&render_time(24, 0, &config)), 0);
        assert_eq!(lit_count(&render_time(0, 60, &config)), 0);
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = RenderConfig::default();
        assert_eq!(render_time(18, 34, &config), render_time(18, 34, &config));
    }
}
