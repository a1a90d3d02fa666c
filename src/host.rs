//! Top-level screen coordinator.
//!
//! [`ScreenHost`] owns the quiz session and the preference store, decides
//! the orientation policy once at startup, and turns preference changes
//! into quiz reconfiguration. Everything it needs from the outside world
//! (screen traits, toasts, haptics, navigation) goes through [`Platform`].

use crate::catalog::RegionId;
use crate::error::Result;
use crate::preferences::{ListenerId, PreferenceDefaults, PreferenceKey, PreferenceStore};
use crate::quiz::{GuessOutcome, QuizSession};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Length of the haptic pulse fired by a manual reset.
pub const RESET_PULSE: Duration = Duration::from_millis(100);

/// Size bucket of the display, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScreenSize {
    Small,
    Normal,
    Large,
    XLarge,
}

impl ScreenSize {
    pub fn classify(cols: u16, rows: u16) -> Self {
        if cols >= 160 && rows >= 48 {
            ScreenSize::XLarge
        } else if cols >= 120 && rows >= 36 {
            ScreenSize::Large
        } else if cols < 60 || rows < 20 {
            ScreenSize::Small
        } else {
            ScreenSize::Normal
        }
    }

    pub fn is_phone(self) -> bool {
        matches!(self, ScreenSize::Small | ScreenSize::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Terminal cells are roughly twice as tall as they are wide.
    pub fn from_size(cols: u16, rows: u16) -> Self {
        if u32::from(rows) * 2 >= u32::from(cols) {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationLock {
    Unlocked,
    Portrait,
}

/// Transient message for the player. A new notice replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    RestartingQuiz,
    DefaultRegionApplied(RegionId),
    RestartingWithDefaultRegion(RegionId),
    QuizReset,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::RestartingQuiz => write!(f, "Quiz will restart with your new settings"),
            Notice::DefaultRegionApplied(region) => write!(
                f,
                "One region must be selected. {} set as the default region.",
                region
            ),
            Notice::RestartingWithDefaultRegion(region) => write!(
                f,
                "{} set as the default region. Quiz will restart.",
                region
            ),
            Notice::QuizReset => write!(f, "Restarting quiz"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    OpenSettings,
    ResetQuiz,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::OpenSettings => "Settings",
            MenuItem::ResetQuiz => "Reset Quiz",
        }
    }
}

pub const MENU: [MenuItem; 2] = [MenuItem::OpenSettings, MenuItem::ResetQuiz];

/// What the host needs from the device it runs on.
pub trait Platform {
    fn screen_size(&self) -> ScreenSize;
    fn orientation(&self) -> Orientation;
    fn notify(&mut self, notice: Notice);
    fn vibrate(&mut self, duration: Duration);
    fn open_settings(&mut self);
}

pub struct ScreenHost<P: Platform> {
    platform: P,
    store: PreferenceStore,
    quiz: QuizSession,
    defaults: PreferenceDefaults,
    phone_device: bool,
    orientation_lock: OrientationLock,
    listener: Option<ListenerId>,
    initialized: bool,
    correcting_regions: bool,
}

impl<P: Platform> ScreenHost<P> {
    pub fn new(
        platform: P,
        store: PreferenceStore,
        quiz: QuizSession,
        defaults: PreferenceDefaults,
    ) -> Self {
        ScreenHost {
            platform,
            store,
            quiz,
            defaults,
            phone_device: true,
            orientation_lock: OrientationLock::Unlocked,
            listener: None,
            initialized: false,
            correcting_regions: false,
        }
    }

    /// Fixes the orientation policy, registers for preference changes and
    /// starts the first quiz. Later calls do nothing.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            debug!("Screen host already initialized");
            return Ok(());
        }

        self.store.set_defaults(&self.defaults, false)?;

        let size = self.platform.screen_size();
        self.phone_device = size.is_phone();
        if self.phone_device {
            self.orientation_lock = OrientationLock::Portrait;
        }
        info!(?size, phone = self.phone_device, "Device classified");

        let mut regions = self.read_regions()?;
        if regions.is_empty() {
            self.write_default_region()?;
            self.platform.notify(Notice::DefaultRegionApplied(RegionId::DEFAULT));
            regions = BTreeSet::from([RegionId::DEFAULT]);
        }

        self.listener = Some(self.store.register_listener()?);

        let choices = self.read_choices()?;
        self.quiz.configure(choices, &regions);
        self.quiz.reset()?;
        self.initialized = true;
        Ok(())
    }

    /// Delivers queued preference changes one at a time. A change written
    /// while handling another is delivered after it, never recursively.
    pub fn dispatch_preference_changes(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Some(key) = self.store.take_change() {
            self.on_preference_changed(key)?;
            handled += 1;
        }
        Ok(handled)
    }

    pub fn on_preference_changed(&mut self, key: PreferenceKey) -> Result<()> {
        debug!(key = key.as_str(), "Preference changed");
        match key {
            PreferenceKey::Choices => {
                let choices = self.read_choices()?;
                let regions = self.quiz.enabled_regions().clone();
                self.quiz.configure(choices, &regions);
                self.quiz.reset()?;
                self.platform.notify(Notice::RestartingQuiz);
            }
            PreferenceKey::Regions => {
                let regions = self.read_regions()?;
                if regions.is_empty() {
                    if self.correcting_regions {
                        warn!("Default region write did not take effect");
                        return Ok(());
                    }
                    self.write_default_region()?;
                    self.correcting_regions = true;
                    self.platform.notify(Notice::DefaultRegionApplied(RegionId::DEFAULT));
                } else {
                    let choices = self.quiz.choice_count();
                    self.quiz.configure(choices, &regions);
                    self.quiz.reset()?;
                    let notice = if std::mem::take(&mut self.correcting_regions) {
                        Notice::RestartingWithDefaultRegion(RegionId::DEFAULT)
                    } else {
                        Notice::RestartingQuiz
                    };
                    self.platform.notify(notice);
                }
            }
        }
        Ok(())
    }

    /// Stores a new choice count and applies it.
    pub fn update_choices(&mut self, choices: usize) -> Result<()> {
        self.store
            .edit()
            .put_int(PreferenceKey::Choices, choices)
            .apply()?;
        self.dispatch_preference_changes()?;
        Ok(())
    }

    /// Stores a new region selection and applies it.
    pub fn update_regions(&mut self, regions: &BTreeSet<RegionId>) -> Result<()> {
        let keys: BTreeSet<String> = regions.iter().map(|r| r.key().to_string()).collect();
        self.store
            .edit()
            .put_string_set(PreferenceKey::Regions, &keys)?
            .apply()?;
        self.dispatch_preference_changes()?;
        Ok(())
    }

    /// Flips one region in the stored selection.
    pub fn toggle_region(&mut self, region: RegionId) -> Result<()> {
        let mut regions = self.read_regions()?;
        if !regions.remove(&region) {
            regions.insert(region);
        }
        self.update_regions(&regions)
    }

    /// The menu is offered only while the screen is in portrait.
    pub fn build_menu(&self) -> Option<[MenuItem; 2]> {
        match self.effective_orientation() {
            Orientation::Portrait => Some(MENU),
            Orientation::Landscape => None,
        }
    }

    pub fn on_menu_item(&mut self, item: MenuItem) -> Result<()> {
        match item {
            MenuItem::OpenSettings => {
                self.on_settings_requested();
                Ok(())
            }
            MenuItem::ResetQuiz => self.on_reset_requested(),
        }
    }

    pub fn on_reset_requested(&mut self) -> Result<()> {
        self.quiz.reset()?;
        self.platform.notify(Notice::QuizReset);
        self.platform.vibrate(RESET_PULSE);
        info!("Quiz reset from menu");
        Ok(())
    }

    /// Starts over from the final score screen. Unlike a menu reset this
    /// is the expected next step, so there is no notice or pulse.
    pub fn play_again(&mut self) -> Result<()> {
        self.quiz.reset()
    }

    pub fn on_settings_requested(&mut self) {
        self.platform.open_settings();
    }

    pub fn submit_guess(&mut self, label: &str) -> Result<GuessOutcome> {
        self.quiz.record_guess(label)
    }

    pub fn requested_orientation(&self) -> OrientationLock {
        self.orientation_lock
    }

    pub fn effective_orientation(&self) -> Orientation {
        match self.orientation_lock {
            OrientationLock::Portrait => Orientation::Portrait,
            OrientationLock::Unlocked => self.platform.orientation(),
        }
    }

    pub fn is_phone_device(&self) -> bool {
        self.phone_device
    }

    /// Large screens in landscape show the settings next to the quiz.
    pub fn shows_settings_pane(&self) -> bool {
        !self.phone_device && self.effective_orientation() == Orientation::Landscape
    }

    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Stored region selection; unknown region names are skipped.
    pub fn read_regions(&self) -> Result<BTreeSet<RegionId>> {
        let stored = self.store.get_string_set(PreferenceKey::Regions)?;
        Ok(stored
            .unwrap_or_default()
            .iter()
            .filter_map(|name| match name.parse::<RegionId>() {
                Ok(region) => Some(region),
                Err(e) => {
                    warn!(error = %e, "Ignoring stored region");
                    None
                }
            })
            .collect())
    }

    pub fn read_choices(&self) -> Result<usize> {
        self.store
            .get_int(PreferenceKey::Choices, self.defaults.choices)
    }

    fn write_default_region(&mut self) -> Result<()> {
        let regions = BTreeSet::from([RegionId::DEFAULT.key().to_string()]);
        info!(region = RegionId::DEFAULT.key(), "No region selected, applying default");
        self.store
            .edit()
            .put_string_set(PreferenceKey::Regions, &regions)?
            .apply()?;
        Ok(())
    }

    /// Unregisters from the preference store. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.listener.take() {
            self.store.unregister_listener(id);
        }
    }
}

impl<P: Platform> Drop for ScreenHost<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
