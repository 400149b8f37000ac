//! Display subsystem: turns published times into colored frames.
//!
//! [`DisplayTask`] caches the persisted display settings and the last
//! published time. Every repaint renders the word mask, picks day or night
//! brightness, colors each cell and hands the row-major frame to the
//! platform's [`LedDriver`].

use heapless::Vec;
use smart_leds::RGB8;

use crate::datetime::{DateTime, Time, is_time_in_interval};
use crate::layout::{ClockMode, MATRIX_HEIGHT, MATRIX_WIDTH};
use crate::message::{Message, MessageId};
use crate::render::{RenderConfig, render_time};
use crate::settings::{
    DEFAULT_CLOCK_IT_IS, DEFAULT_CLOCK_MODE, DEFAULT_CLOCK_SINGLE_MINUTES,
    DEFAULT_COLOR_BACKGROUND, DEFAULT_COLOR_TIME, DEFAULT_LED_BRIGHTNESS,
    DEFAULT_NIGHT_BRIGHTNESS, DEFAULT_NIGHT_MODE_END, DEFAULT_NIGHT_MODE_START,
    DEFAULT_USE_NIGHT_MODE, KEY_CLOCK_IT_IS, KEY_CLOCK_MODE, KEY_CLOCK_SINGLE_MINUTES,
    KEY_COLOR_BACKGROUND, KEY_COLOR_TIME, KEY_LED_BRIGHTNESS, KEY_NIGHT_BRIGHTNESS,
    KEY_NIGHT_MODE_END, KEY_NIGHT_MODE_START, KEY_USE_NIGHT_MODE, SettingsStore,
};
use crate::task::TaskHandler;

/// Cells of the face, and so LEDs in a frame.
pub const LED_CELL_COUNT: usize = MATRIX_WIDTH as usize * MATRIX_HEIGHT as usize;

/// The platform's strip driver.
pub trait LedDriver {
    /// Stage one row-major frame of cell colors.
    fn write(&mut self, frame: &[RGB8]);
    /// Flush the staged frame to the strip.
    fn show(&mut self);
}

/// The persisted display settings, decoded into working form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockSettings {
    pub mode: ClockMode,
    pub show_it_is: bool,
    pub show_single_minutes: bool,
    pub color_time: RGB8,
    pub color_background: RGB8,
    pub brightness: u8,
    pub use_night_mode: bool,
    pub night_brightness: u8,
    pub night_start: Time,
    pub night_end: Time,
}

impl ClockSettings {
    /// Read every display setting, falling back to the defaults for keys
    /// never written.
    pub fn load(store: &impl SettingsStore) -> Self {
        Self {
            mode: ClockMode::from_setting(store.get_u8(KEY_CLOCK_MODE, DEFAULT_CLOCK_MODE)),
            show_it_is: store.get_bool(KEY_CLOCK_IT_IS, DEFAULT_CLOCK_IT_IS),
            show_single_minutes: store
                .get_bool(KEY_CLOCK_SINGLE_MINUTES, DEFAULT_CLOCK_SINGLE_MINUTES),
            color_time: unpack_color(store.get_u32(KEY_COLOR_TIME, DEFAULT_COLOR_TIME)),
            color_background: unpack_color(
                store.get_u32(KEY_COLOR_BACKGROUND, DEFAULT_COLOR_BACKGROUND),
            ),
            brightness: store.get_u8(KEY_LED_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS).min(100),
            use_night_mode: store.get_bool(KEY_USE_NIGHT_MODE, DEFAULT_USE_NIGHT_MODE),
            night_brightness: store
                .get_u8(KEY_NIGHT_BRIGHTNESS, DEFAULT_NIGHT_BRIGHTNESS)
                .min(100),
            night_start: Time::from_hm_dword(
                store.get_u32(KEY_NIGHT_MODE_START, DEFAULT_NIGHT_MODE_START),
            ),
            night_end: Time::from_hm_dword(
                store.get_u32(KEY_NIGHT_MODE_END, DEFAULT_NIGHT_MODE_END),
            ),
        }
    }

    /// The rendering subset of the settings.
    pub const fn render_config(&self) -> RenderConfig {
        RenderConfig {
            mode: self.mode,
            show_it_is: self.show_it_is,
            show_single_minutes: self.show_single_minutes,
        }
    }
}

/// Unpack a persisted 0xRRGGBB value.
pub fn unpack_color(packed: u32) -> RGB8 {
    RGB8::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

/// Pack a color into the persisted 0xRRGGBB form.
pub fn pack_color(color: RGB8) -> u32 {
    u32::from(color.r) << 16 | u32::from(color.g) << 8 | u32::from(color.b)
}

fn scale_color(color: RGB8, brightness_percent: u8) -> RGB8 {
    let percent = u16::from(brightness_percent.min(100));
    let scale = |value: u8| (u16::from(value) * percent / 100) as u8;
    RGB8::new(scale(color.r), scale(color.g), scale(color.b))
}

/// The display subsystem.
pub struct DisplayTask<D: LedDriver, S: SettingsStore> {
    driver: D,
    store: S,
    settings: ClockSettings,
    last_datetime: Option<DateTime>,
}

impl<D: LedDriver, S: SettingsStore> DisplayTask<D, S> {
    /// New task with settings loaded from `store`. The face stays dark
    /// until the first time arrives.
    pub fn new(driver: D, store: S) -> Self {
        let settings = ClockSettings::load(&store);
        Self {
            driver,
            store,
            settings,
            last_datetime: None,
        }
    }

    /// The active settings.
    pub const fn settings(&self) -> &ClockSettings {
        &self.settings
    }

    fn repaint(&mut self) {
        let Some(datetime) = self.last_datetime else {
            return;
        };
        let mask = render_time(
            datetime.time.hour,
            datetime.time.minute,
            &self.settings.render_config(),
        );

        let night = self.settings.use_night_mode
            && is_time_in_interval(
                datetime.time,
                self.settings.night_start,
                self.settings.night_end,
            );
        let brightness = if night {
            self.settings.night_brightness
        } else {
            self.settings.brightness
        };

        let mut frame: Vec<RGB8, LED_CELL_COUNT> = Vec::new();
        for index in 0..mask.size() {
            let color = if mask.is_bit(index) {
                self.settings.color_time
            } else {
                self.settings.color_background
            };
            let _ = frame.push(scale_color(color, brightness));
        }
        self.driver.write(&frame);
        self.driver.show();
    }
}

impl<D: LedDriver, S: SettingsStore> TaskHandler for DisplayTask<D, S> {
    fn on_message(&mut self, message: &Message) {
        match message.id {
            MessageId::DatetimeChanged => match message.decode_u32_payload() {
                Ok(dword) => {
                    self.last_datetime = Some(DateTime::from_dword(dword));
                    self.repaint();
                }
                Err(_) => warn!("display: truncated datetime dropped"),
            },
            MessageId::SettingsChanged => {
                debug!("display: settings changed, reloading");
                self.settings = ClockSettings::load(&self.store);
                self.repaint();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_packing_round_trips() {
        let color = RGB8::new(0x12, 0x34, 0x56);
        assert_eq!(unpack_color(pack_color(color)), color);
        assert_eq!(unpack_color(0x00FF00), RGB8::new(0, 255, 0));
    }

    #[test]
    fn scaling_is_proportional_and_saturating() {
        let color = RGB8::new(200, 100, 0);
        assert_eq!(scale_color(color, 100), color);
        assert_eq!(scale_color(color, 50), RGB8::new(100, 50, 0));
        assert_eq!(scale_color(color, 0), RGB8::new(0, 0, 0));
        // Over-100 inputs clamp rather than overflow.
        assert_eq!(scale_color(color, 255), color);
    }
}
