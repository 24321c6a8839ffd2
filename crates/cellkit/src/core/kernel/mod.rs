//! The interaction kernel shared by every widget.
//!
//! A widget owns a [`Kernel`] holding its geometry, regions, bindings,
//! signal observers, focus flag and exit status, and implements [`Widget`]
//! to supply drawing and built-in key handling. The provided methods on
//! [`Widget`] run the interaction cycle:
//!
//! - [`Widget::inject`] processes one key: the `BeforeInput` signal may veto
//!   it, a binding may claim it, and otherwise the widget's built-in handling
//!   decides what it does.
//! - [`Widget::activate`] draws the widget and feeds it keys, either from a
//!   script or from the screen's input source, until the exit status leaves
//!   [`ExitStatus::Continue`].

/// Key binding tables.
pub mod binding;
/// Signal hooks.
pub mod signal;

pub use binding::{Action, BindingTable, Observer, observer};
pub use signal::{COMMON_SIGNALS, Signal, Signals};
use tracing::{debug, trace, warn};

use crate::{
    draw,
    error::{Error, Result},
    event::{Key, keys},
    geom::{Expanse, GeometrySpec, Point, Position, Rect, resolve_position},
    markup::AttributedText,
    screen::{Screen, WidgetId},
    surface::RegionId,
};

/// Where an interaction cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Still consuming input.
    Continue,
    /// Ended by a confirming key.
    Confirmed(Key),
    /// Ended by the cancel key, or by a failed read (`None`).
    Cancelled(Option<Key>),
}

/// The result of [`Widget::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The user confirmed; carries the widget's result.
    Confirmed(T),
    /// The user cancelled, or input failed.
    Cancelled,
    /// A scripted key list ran out before the interaction ended.
    Exhausted,
}

/// What a widget's built-in handling made of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The key was handled; keep going.
    Handled,
    /// The key was rejected; emit a notice and keep going.
    Notice,
    /// The key asks to confirm and leave.
    Leave,
    /// The key asks to cancel.
    Cancel,
}

/// Borders, shadow and title shared by all widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chrome {
    /// Draw a border.
    pub boxed: bool,
    /// Draw a drop shadow, if there is room for one.
    pub shadow: bool,
    /// Title lines, as markup.
    pub title: Vec<String>,
}

/// Per-widget kernel state.
pub struct Kernel<W> {
    /// Registry id.
    id: WidgetId,
    /// Widget kind.
    kind: &'static str,
    /// Placement request, updated when the widget moves.
    spec: GeometrySpec,
    /// Resolved bounds in screen coordinates.
    rect: Rect,
    /// Border drawn?
    boxed: bool,
    /// The widget's top-level region.
    window: RegionId,
    /// Shadow region, when there was room for one.
    shadow: Option<RegionId>,
    /// Was a shadow requested? It comes and goes with the room for it.
    wants_shadow: bool,
    /// Compiled title lines.
    title: Vec<AttributedText>,
    /// Key bindings.
    bindings: BindingTable<W>,
    /// Signal observers.
    signals: Signals<W>,
    /// Exit status of the current cycle.
    exit: ExitStatus,
    /// Does the widget have focus?
    focused: bool,
}

impl<W> Kernel<W> {
    /// Allocate the widget's window (and shadow) for an outer size placed
    /// according to `spec`. Fails if the size does not fit on the screen.
    pub fn new(
        screen: &mut Screen,
        id: WidgetId,
        kind: &'static str,
        supported: &'static [Signal],
        spec: GeometrySpec,
        size: Expanse,
        chrome: &Chrome,
    ) -> Result<Self> {
        let parent = screen.size();
        if size.is_empty() {
            return Err(Error::Construct(format!("{kind}: empty geometry {size:?}")));
        }
        if size.w > parent.w || size.h > parent.h {
            return Err(Error::Construct(format!(
                "{kind}: {size:?} does not fit in {parent:?}"
            )));
        }
        let rect = spec.place(parent, size);
        let shadow_rect = rect.shift(Point { x: 1, y: 1 });
        let shadow = if chrome.shadow && parent.rect().contains_rect(&shadow_rect) {
            Some(screen.create_region(id, None, shadow_rect)?)
        } else {
            None
        };
        let window = screen.create_region(id, None, rect)?;
        let title = chrome.title.iter().map(|t| screen.compile(t)).collect();
        debug!(?id, kind, ?rect, "kernel created");
        Ok(Self {
            id,
            kind,
            spec,
            rect,
            boxed: chrome.boxed,
            window,
            shadow,
            wants_shadow: chrome.shadow,
            title,
            bindings: BindingTable::default(),
            signals: Signals::new(supported),
            exit: ExitStatus::Continue,
            focused: false,
        })
    }

    /// Registry id.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Widget kind.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Bounds in screen coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The current placement request.
    pub fn spec(&self) -> GeometrySpec {
        self.spec
    }

    /// The top-level region.
    pub fn window(&self) -> RegionId {
        self.window
    }

    /// The shadow region, if any.
    pub fn shadow(&self) -> Option<RegionId> {
        self.shadow
    }

    /// Is a border drawn?
    pub fn boxed(&self) -> bool {
        self.boxed
    }

    /// Border thickness.
    pub fn border(&self) -> u32 {
        u32::from(self.boxed)
    }

    /// Number of title rows.
    pub fn title_rows(&self) -> u32 {
        self.title.len() as u32
    }

    /// Window-relative origin of the area below border and title.
    pub fn content_origin(&self) -> Point {
        Point {
            x: self.border(),
            y: self.border() + self.title_rows(),
        }
    }

    /// Width inside the border.
    pub fn inner_width(&self) -> u32 {
        self.rect.w.saturating_sub(2 * self.border())
    }

    /// Exit status of the current cycle.
    pub fn exit(&self) -> ExitStatus {
        self.exit
    }

    /// Does the widget have focus?
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Set the focus flag without redrawing.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Key bindings.
    pub fn bindings(&self) -> &BindingTable<W> {
        &self.bindings
    }

    /// Mutable key bindings.
    pub fn bindings_mut(&mut self) -> &mut BindingTable<W> {
        &mut self.bindings
    }

    /// Signal observers.
    pub fn signals(&self) -> &Signals<W> {
        &self.signals
    }

    /// Draw shadow, border and title.
    pub fn draw_chrome(&self, screen: &mut Screen) -> Result<()> {
        if let Some(s) = self.shadow {
            draw::draw_shadow(screen, s)?;
        }
        if self.boxed {
            draw::draw_box(screen, self.window, Default::default())?;
        }
        let b = self.border();
        for (i, t) in self.title.iter().enumerate() {
            draw::write_text(screen, self.window, b + i as u32, b, self.inner_width(), t)?;
        }
        Ok(())
    }

    /// Move the window (and shadow) to a new position. Relative moves offset
    /// the current origin by absolute amounts; symbolic positions always
    /// resolve against the screen. A requested shadow is dropped while it
    /// would fall off the screen and allocated again once it fits.
    pub fn relocate(
        &mut self,
        screen: &mut Screen,
        x: Position,
        y: Position,
        relative: bool,
    ) -> Result<()> {
        let parent = screen.size();
        let axis = |cur: u32, req: Position, extent: u32, size: u32| match (relative, req) {
            (true, Position::At(d)) => {
                let room = i64::from(extent.saturating_sub(size));
                (i64::from(cur) + i64::from(d)).clamp(0, room) as u32
            }
            _ => resolve_position(extent, req, size),
        };
        let tl = Point {
            x: axis(self.rect.tl.x, x, parent.w, self.rect.w),
            y: axis(self.rect.tl.y, y, parent.h, self.rect.h),
        };
        screen.move_region(self.window, tl)?;
        let shadow_rect = Rect {
            tl: Point {
                x: tl.x + 1,
                y: tl.y + 1,
            },
            ..self.rect
        };
        let fits = parent.rect().contains_rect(&shadow_rect);
        match (self.shadow, fits) {
            (Some(s), true) => screen.move_region(s, shadow_rect.tl)?,
            (Some(s), false) => {
                screen.destroy_region(self.id, s)?;
                self.shadow = None;
            }
            (None, true) if self.wants_shadow => {
                self.shadow = Some(screen.create_region(self.id, None, shadow_rect)?);
            }
            (None, _) => {}
        }
        self.rect.tl = tl;
        self.spec.x = Position::At(tl.x as i32);
        self.spec.y = Position::At(tl.y as i32);
        debug!(id = ?self.id, ?tl, "moved");
        Ok(())
    }
}

/// Register a widget and build it. If building fails, every region the
/// widget acquired is released and the widget is unregistered before the
/// error is returned.
pub fn construct<W, F>(screen: &mut Screen, kind: &'static str, build: F) -> Result<W>
where
    F: FnOnce(&mut Screen, WidgetId) -> Result<W>,
{
    let id = screen.register(kind);
    match build(screen, id) {
        Ok(w) => Ok(w),
        Err(e) => {
            screen.unregister(id)?;
            debug!(kind, "construction failed: {e}");
            Err(match e {
                Error::Construct(m) => Error::Construct(m),
                other => Error::Construct(format!("{kind}: {other}")),
            })
        }
    }
}

/// Draw a widget as though its focus flag were `focused`, restoring the real
/// flag afterwards.
pub fn draw_focused_as<W: Widget>(w: &mut W, screen: &mut Screen, focused: bool) -> Result<()> {
    let saved = w.kernel().focused();
    w.kernel_mut().set_focused(focused);
    let ret = w.draw(screen);
    w.kernel_mut().set_focused(saved);
    ret
}

/// Call one observer, guarding against re-entry.
fn call<W>(obs: &Observer<W>, w: &mut W, screen: &mut Screen, key: Key) -> Result<bool> {
    let mut f = obs
        .try_borrow_mut()
        .map_err(|_| Error::Internal("observer re-entered".into()))?;
    (*f)(w, screen, key)
}

/// A widget built on the interaction kernel.
pub trait Widget: Sized {
    /// What a confirmed interaction returns.
    type Output;

    /// The widget's kernel.
    fn kernel(&self) -> &Kernel<Self>;

    /// The widget's kernel, mutably.
    fn kernel_mut(&mut self) -> &mut Kernel<Self>;

    /// Draw the whole widget.
    fn draw(&mut self, screen: &mut Screen) -> Result<()>;

    /// Built-in handling for one key. Not called for keys claimed by a
    /// binding, or for the cancel key.
    fn handle_input(&mut self, screen: &mut Screen, key: Key) -> Result<Step>;

    /// The widget's current result.
    fn output(&self) -> Self::Output;

    /// Registry id.
    fn id(&self) -> WidgetId {
        self.kernel().id()
    }

    /// Exit status of the current cycle.
    fn exit_status(&self) -> ExitStatus {
        self.kernel().exit()
    }

    /// Take focus and redraw.
    fn focus(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel_mut().set_focused(true);
        self.draw(screen)
    }

    /// Give up focus and redraw.
    fn unfocus(&mut self, screen: &mut Screen) -> Result<()> {
        self.kernel_mut().set_focused(false);
        self.draw(screen)
    }

    /// Blank the widget's regions.
    fn erase(&mut self, screen: &mut Screen) -> Result<()> {
        screen.erase_widget(self.id())
    }

    /// Erase the widget and release everything it holds.
    fn destroy(mut self, screen: &mut Screen) -> Result<()> {
        self.erase(screen)?;
        screen.unregister(self.id())
    }

    /// Move the widget and redraw it.
    fn move_to(&mut self, screen: &mut Screen, x: Position, y: Position, relative: bool) -> Result<()> {
        self.erase(screen)?;
        self.kernel_mut().relocate(screen, x, y, relative)?;
        self.draw(screen)
    }

    /// Bind a key. Bindings take precedence over built-in handling.
    fn bind(&mut self, key: Key, action: Action<Self>) {
        self.kernel_mut().bindings_mut().bind(key, action);
    }

    /// Connect an observer to a signal this widget supports.
    fn connect(&mut self, signal: Signal, obs: Observer<Self>) -> Result<()> {
        let k = self.kernel_mut();
        if !k.signals.supports(signal) {
            return Err(Error::Invalid(format!(
                "{} does not emit {signal:?}",
                k.kind
            )));
        }
        k.signals.connect(signal, obs);
        Ok(())
    }

    /// Run every observer of a signal. Returns false if a vetoing signal was
    /// vetoed.
    fn emit(&mut self, screen: &mut Screen, signal: Signal, key: Key) -> Result<bool> {
        for obs in self.kernel().signals.observers(signal) {
            if !call(&obs, self, screen, key)? && signal.can_veto() {
                trace!(?signal, %key, "vetoed");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Feed one key to the widget.
    fn inject(&mut self, screen: &mut Screen, key: Key) -> Result<ExitStatus> {
        self.kernel_mut().exit = ExitStatus::Continue;
        trace!(kind = self.kernel().kind(), %key, "inject");
        if !self.emit(screen, Signal::BeforeInput, key)? {
            return Ok(ExitStatus::Continue);
        }

        let action = self.kernel().bindings().get(key);
        let (step, effective) = match action {
            Some(Action::Remap(to)) => (dispatch(self, screen, to)?, to),
            Some(Action::Observe(obs)) => {
                if call(&obs, self, screen, key)? {
                    (Step::Handled, key)
                } else {
                    (dispatch(self, screen, key)?, key)
                }
            }
            None => (dispatch(self, screen, key)?, key),
        };

        match step {
            Step::Handled => {}
            Step::Notice => screen.notice(),
            Step::Leave => {
                if self.emit(screen, Signal::BeforeLeaving, effective)? {
                    self.emit(screen, Signal::AfterLeaving, effective)?;
                    self.kernel_mut().exit = ExitStatus::Confirmed(effective);
                    debug!(kind = self.kernel().kind(), %effective, "confirmed");
                }
            }
            Step::Cancel => {
                self.kernel_mut().exit = ExitStatus::Cancelled(Some(effective));
                debug!(kind = self.kernel().kind(), %effective, "cancelled");
            }
        }

        if self.kernel().exit() == ExitStatus::Continue {
            self.emit(screen, Signal::AfterInput, key)?;
        }
        Ok(self.kernel().exit())
    }

    /// Draw the widget and run an interaction cycle. With a script, keys come
    /// from the script and running out of keys yields
    /// [`Outcome::Exhausted`]; without one, keys are read from the screen and
    /// a failed read cancels.
    fn activate(&mut self, screen: &mut Screen, script: Option<&[Key]>) -> Result<Outcome<Self::Output>> {
        self.kernel_mut().exit = ExitStatus::Continue;
        self.draw(screen)?;
        screen.refresh_all()?;
        match script {
            Some(keys) => {
                for key in keys {
                    if self.inject(screen, *key)? != ExitStatus::Continue {
                        break;
                    }
                    screen.refresh_all()?;
                }
            }
            None => loop {
                let key = match screen.read_input() {
                    Ok(k) => k,
                    Err(e) => {
                        warn!(kind = self.kernel().kind(), "input failed: {e}");
                        self.kernel_mut().exit = ExitStatus::Cancelled(None);
                        break;
                    }
                };
                if self.inject(screen, key)? != ExitStatus::Continue {
                    break;
                }
                screen.refresh_all()?;
            },
        }
        screen.refresh_all()?;
        Ok(match self.kernel().exit() {
            ExitStatus::Confirmed(_) => Outcome::Confirmed(self.output()),
            ExitStatus::Cancelled(_) => Outcome::Cancelled,
            ExitStatus::Continue => Outcome::Exhausted,
        })
    }
}

/// Route a key to built-in handling. The cancel key always cancels.
fn dispatch<W: Widget>(w: &mut W, screen: &mut Screen, key: Key) -> Result<Step> {
    if key.normalize() == keys::CANCEL {
        return Ok(Step::Cancel);
    }
    w.handle_input(screen, key)
}
