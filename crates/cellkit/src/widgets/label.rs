//! A boxed block of markup lines.
use serde_json::Value;
use tracing::debug;

use crate::{
    config::{self, Options, Schema},
    draw,
    error::{Error, Result},
    event::{Key, KeyCode},
    geom::{Expanse, GeometrySpec, Position},
    kernel::{Chrome, Kernel, Signal, Step, Widget, construct},
    markup::AttributedText,
    screen::Screen,
};

/// Signals a label emits.
const SIGNALS: &[Signal] = &[
    Signal::BeforeInput,
    Signal::AfterInput,
    Signal::BeforeLeaving,
    Signal::AfterLeaving,
    Signal::BeforeMessageChange,
];

/// Label options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelConfig {
    /// Horizontal placement.
    pub x: Position,
    /// Vertical placement.
    pub y: Position,
    /// Message lines, as markup.
    pub message: Vec<String>,
    /// Draw a border.
    pub boxed: bool,
    /// Draw a drop shadow.
    pub shadow: bool,
}

impl LabelConfig {
    /// The option schema.
    pub fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .field("x", "CENTER", |c, v| {
                c.x = config::as_position(v)?;
                Ok(())
            })
            .field("y", "CENTER", |c, v| {
                c.y = config::as_position(v)?;
                Ok(())
            })
            .field("message", Value::Null, |c, v| {
                c.message = config::as_lines(v)?;
                Ok(())
            })
            .field("box", true, |c, v| {
                c.boxed = config::as_bool(v)?;
                Ok(())
            })
            .field("shadow", false, |c, v| {
                c.shadow = config::as_bool(v)?;
                Ok(())
            })
    }

    /// Build a config from option overrides.
    pub fn from_options(opts: &Options) -> Result<Self> {
        Self::schema().build(opts)
    }
}

/// Lines of markup, each justified on its own inside the label. The label is
/// sized to its initial message; later messages are clipped to that size.
pub struct Label {
    /// Kernel state.
    kernel: Kernel<Label>,
    /// Compiled message lines.
    lines: Vec<AttributedText>,
    /// A message waiting on `BeforeMessageChange` observers.
    pending: Option<Vec<String>>,
}

impl Label {
    /// Build a label on the screen. An empty message fails.
    pub fn new(screen: &mut Screen, conf: LabelConfig) -> Result<Self> {
        construct(screen, "label", |screen, id| {
            if conf.message.is_empty() {
                return Err(Error::Construct("label: empty message".into()));
            }
            let lines: Vec<AttributedText> = conf.message.iter().map(|l| screen.compile(l)).collect();
            let border = u32::from(conf.boxed);
            let widest = lines.iter().map(|l| l.width() as u32).max().unwrap_or(0);
            let size = Expanse::new(widest + 2 * border, lines.len() as u32 + 2 * border);
            let spec = GeometrySpec::new(conf.x, conf.y, size.w as i32, size.h as i32);
            let chrome = Chrome {
                boxed: conf.boxed,
                shadow: conf.shadow,
                title: vec![],
            };
            Ok(Self {
                kernel: Kernel::new(screen, id, "label", SIGNALS, spec, size, &chrome)?,
                lines,
                pending: None,
            })
        })
    }

    /// The current message as plain text.
    pub fn message(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.plain_text()).collect()
    }

    /// The message being proposed to `BeforeMessageChange` observers.
    pub fn pending_message(&self) -> Option<&[String]> {
        self.pending.as_deref()
    }

    /// Replace the message and redraw. Observers of `BeforeMessageChange` may
    /// veto the change, in which case this returns false and nothing
    /// changes.
    pub fn set_message<S: AsRef<str>>(&mut self, screen: &mut Screen, message: &[S]) -> Result<bool> {
        self.pending = Some(message.iter().map(|s| s.as_ref().to_string()).collect());
        let allowed = self.emit(screen, Signal::BeforeMessageChange, Key::from(KeyCode::Null));
        let pending = self.pending.take();
        if !allowed? {
            debug!("label message change vetoed");
            return Ok(false);
        }
        self.lines = pending
            .unwrap_or_default()
            .iter()
            .map(|l| screen.compile(l))
            .collect();
        screen.erase_region(self.kernel.window())?;
        self.draw(screen)?;
        Ok(true)
    }

    /// Draw the label and block until `key` is pressed, or until any key is
    /// pressed if `key` is `None`. Returns the key that ended the wait.
    pub fn wait(&mut self, screen: &mut Screen, key: Option<Key>) -> Result<Key> {
        self.draw(screen)?;
        screen.refresh_all()?;
        loop {
            let k = screen.read_input()?;
            match key {
                Some(want) if k.normalize() != want.normalize() => continue,
                _ => return Ok(k),
            }
        }
    }
}

impl Widget for Label {
    type Output = ();

    fn kernel(&self) -> &Kernel<Self> {
        &self.kernel
    }

    fn kernel_mut(&mut self) -> &mut Kernel<Self> {
        &mut self.kernel
    }

    fn draw(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel.draw_chrome(screen)?;
        let o = self.kernel.content_origin();
        let width = self.kernel.inner_width();
        let rows = self.kernel.rect().h.saturating_sub(2 * self.kernel.border());
        for (i, line) in self.lines.iter().take(rows as usize).enumerate() {
            draw::write_text(screen, self.kernel.window(), o.y + i as u32, o.x, width, line)?;
        }
        Ok(())
    }

    fn handle_input(&mut self, _: &mut Screen, _: Key) -> Result<Step> {
        Ok(Step::Leave)
    }

    fn output(&self) {}
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        event::keys,
        kernel::{ExitStatus, Outcome, observer},
        testing::Harness,
    };

    fn label(h: &mut Harness, opts: Value) -> Result<Label> {
        let opts = match opts {
            Value::Object(m) => m,
            _ => Options::new(),
        };
        Label::new(&mut h.screen, LabelConfig::from_options(&opts)?)
    }

    #[test]
    fn justified_lines() -> Result<()> {
        let mut h = Harness::new(12, 5);
        let mut l = label(&mut h, json!({"message": ["<C>hi", "<R>right", "left  x"], "x": 0, "y": 0}))?;
        l.draw(&mut h.screen)?;
        assert_eq!(
            h.canvas().text(),
            vec![
                "┌───────┐   ",
                "│  hi   │   ",
                "│  right│   ",
                "│left  x│   ",
                "└───────┘   ",
            ]
        );
        Ok(())
    }

    #[test]
    fn any_key_confirms() -> Result<()> {
        let mut h = Harness::new(12, 5);
        let mut l = label(&mut h, json!({"message": "x"}))?;
        assert_eq!(l.activate(&mut h.screen, Some(&[Key::from('q')]))?, Outcome::Confirmed(()));
        assert_eq!(l.exit_status(), ExitStatus::Confirmed(Key::from('q')));
        assert_eq!(
            l.activate(&mut h.screen, Some(&[keys::CANCEL]))?,
            Outcome::Cancelled
        );
        Ok(())
    }

    #[test]
    fn message_change_veto() -> Result<()> {
        let mut h = Harness::new(20, 5);
        let mut l = label(&mut h, json!({"message": "first"}))?;
        let seen = Rc::new(RefCell::new(vec![]));
        let s = seen.clone();
        l.connect(
            Signal::BeforeMessageChange,
            observer(move |l: &mut Label, _: &mut Screen, _| {
                let next = l.pending_message().unwrap_or_default().to_vec();
                let ok = next.iter().all(|m| !m.contains("nope"));
                s.borrow_mut().push(next);
                Ok(ok)
            }),
        )?;
        assert!(!l.set_message(&mut h.screen, &["nope"])?);
        assert_eq!(l.message(), vec!["first"]);
        assert!(l.set_message(&mut h.screen, &["<C>ok"])?);
        assert_eq!(l.message(), vec!["ok"]);
        assert!(h.canvas().contains("│ ok  │"));
        assert_eq!(seen.borrow().len(), 2);
        assert!(l.pending_message().is_none());
        Ok(())
    }

    #[test]
    fn wait_for_a_key() -> Result<()> {
        let mut h = Harness::new(12, 5);
        let mut l = label(&mut h, json!({"message": "x"}))?;
        h.script.push(['a', 'b', 'z', 'c']);
        assert_eq!(l.wait(&mut h.screen, Some(Key::from('z')))?, Key::from('z'));
        assert_eq!(l.wait(&mut h.screen, None)?, Key::from('c'));
        assert!(l.wait(&mut h.screen, None).is_err());
        Ok(())
    }

    #[test]
    fn empty_message_fails() {
        let mut h = Harness::new(12, 5);
        assert!(matches!(label(&mut h, json!({})), Err(Error::Construct(_))));
        assert!(matches!(
            label(&mut h, json!({"message": "far too wide for the screen"})),
            Err(Error::Construct(_))
        ));
    }
}
