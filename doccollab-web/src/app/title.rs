use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::app::config::config;
use crate::utils::{
    Result, WebError,
    dom::{document, listen, window},
    timer::Interval,
};

/// Title shown while `count` messages are unread.
pub fn alert_title(count: u32) -> String {
    if count == 1 {
        "(1) New message!".to_string()
    } else {
        format!("({}) New messages!", count)
    }
}

/// Unread counter and the alternating title it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFlasher {
    original: String,
    unread: u32,
    show_alert: bool,
}

impl TitleFlasher {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            unread: 0,
            show_alert: true,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    pub fn notify(&mut self) -> u32 {
        self.unread += 1;
        self.unread
    }

    pub fn reset(&mut self) {
        self.unread = 0;
        self.show_alert = true;
    }

    /// The title for the next interval tick. Alternates between the alert and
    /// the original title while messages are unread.
    pub fn tick(&mut self) -> String {
        if self.unread == 0 {
            return self.original.clone();
        }

        let title = if self.show_alert {
            alert_title(self.unread)
        } else {
            self.original.clone()
        };
        self.show_alert = !self.show_alert;
        title
    }
}

/// Flashes `document.title` while messages arrive in a background tab.
pub struct TitleNotifier {
    flasher: Rc<RefCell<TitleFlasher>>,
    interval: Option<Interval>,
}

impl TitleNotifier {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            flasher: Rc::new(RefCell::new(TitleFlasher::new(original))),
            interval: None,
        }
    }

    /// Captures the current page title.
    pub fn from_document() -> Result<Self> {
        Ok(Self::new(document()?.title()))
    }

    pub fn unread(&self) -> u32 {
        self.flasher.borrow().unread()
    }

    pub fn is_flashing(&self) -> bool {
        self.interval.is_some()
    }

    pub fn notify_new_message(&mut self) -> Result<()> {
        let count = self.flasher.borrow_mut().notify();
        debug!("{} unread message(s)", count);
        self.start()
    }

    /// Begins flashing. Already running or nothing unread is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.interval.is_some() || self.unread() == 0 {
            return Ok(());
        }

        let flasher = self.flasher.clone();
        let interval = Interval::new(config().title_flash_interval_ms, move || {
            let title = flasher.borrow_mut().tick();
            if let Ok(document) = document() {
                document.set_title(&title);
            }
        })?;

        self.interval = Some(interval);
        Ok(())
    }

    /// Clears the interval and restores the original title.
    pub fn stop(&mut self) {
        self.interval = None;

        let original = self.flasher.borrow().original().to_string();
        if let Ok(document) = document() {
            document.set_title(&original);
        }
    }

    pub fn reset(&mut self) {
        self.flasher.borrow_mut().reset();
        self.stop();
    }
}

thread_local! {
    static NOTIFIER: RefCell<Option<TitleNotifier>> = const { RefCell::new(None) };
}

fn with_notifier<R>(f: impl FnOnce(&mut TitleNotifier) -> R) -> Result<R> {
    NOTIFIER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(TitleNotifier::from_document()?);
            install_focus_reset()?;
        }

        match slot.as_mut() {
            Some(notifier) => Ok(f(notifier)),
            None => Err(WebError::NoDocument),
        }
    })
}

fn install_focus_reset() -> Result<()> {
    listen(&window()?.into(), "focus", |_| {
        NOTIFIER.with(|cell| {
            if let Ok(mut slot) = cell.try_borrow_mut() {
                if let Some(notifier) = slot.as_mut() {
                    notifier.reset();
                }
            }
        });
    })
}

/// Counts one more unread message and starts flashing the page title.
pub fn notify_new_message() -> Result<()> {
    with_notifier(|notifier| notifier.notify_new_message())?
}

pub fn reset_title() -> Result<()> {
    with_notifier(|notifier| notifier.reset())
}

/// Creates the page notifier so focus resets are wired before the first message.
pub fn init_title_notifier() {
    if let Err(e) = with_notifier(|_| ()) {
        warn!("Title notifier unavailable: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_pluralize() {
        assert_eq!(alert_title(1), "(1) New message!");
        assert_eq!(alert_title(3), "(3) New messages!");
    }

    #[test]
    fn flasher_alternates_while_unread() {
        let mut flasher = TitleFlasher::new("Group chat");
        flasher.notify();
        flasher.notify();

        assert_eq!(flasher.tick(), "(2) New messages!");
        assert_eq!(flasher.tick(), "Group chat");
        assert_eq!(flasher.tick(), "(2) New messages!");
    }

    #[test]
    fn count_updates_between_ticks() {
        let mut flasher = TitleFlasher::new("Chat");
        flasher.notify();
        assert_eq!(flasher.tick(), "(1) New message!");

        flasher.notify();
        assert_eq!(flasher.tick(), "Chat");
        assert_eq!(flasher.tick(), "(2) New messages!");
    }

    #[test]
    fn reset_restores_original() {
        let mut flasher = TitleFlasher::new("Chat");
        flasher.notify();
        flasher.tick();
        flasher.reset();

        assert_eq!(flasher.unread(), 0);
        assert_eq!(flasher.tick(), "Chat");

        flasher.notify();
        assert_eq!(flasher.tick(), "(1) New message!");
    }

    #[test]
    fn notifier_without_unread_does_not_start() {
        let mut notifier = TitleNotifier::new("Chat");
        notifier.start().unwrap();
        assert!(!notifier.is_flashing());
        assert_eq!(notifier.unread(), 0);
    }
}
