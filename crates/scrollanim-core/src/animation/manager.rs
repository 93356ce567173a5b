//! Registry of bound elements.
//!
//! The `ScrollAnimator` is the sole owner of every `ElementBinding`. It
//! handles:
//! - Registering named actions for `custom` animations
//! - Binding elements (validating options and snapshotting current values)
//! - Recomputing all bindings when the viewport changes
//!
//! # Usage
//!
//! ```ignore
//! let mut animator = ScrollAnimator::new();
//! animator.register_action("spin", |element, _settings, progress| {
//!     // drive something the engine does not know about
//! });
//! animator.bind("hero", options, &geometry)?;
//!
//! // On every scroll or resize notification:
//! animator.on_viewport_changed(&viewport, &geometry, &mut writer);
//! ```
//!
//! Writes must not trigger a new notification synchronously; the animator is
//! not re-entrant.

use std::collections::HashMap;

use tracing::debug;

use super::binding::ElementBinding;
use super::schema::BindingOptions;
use super::types::{Action, ActionTable, BindingSettings};
use crate::area::compute_active_area;
use crate::error::{ConfigError, Result};
use crate::provider::{ElementGeometryProvider, ElementId, PropertyWriter, ViewportProvider};

/// Central registry for scroll-driven bindings.
#[derive(Debug, Default)]
pub struct ScrollAnimator {
    /// Bindings indexed by element.
    bindings: HashMap<ElementId, ElementBinding>,

    /// Elements in binding order; updates run in this order.
    order: Vec<ElementId>,

    /// Callbacks that `custom` animations may refer to by name.
    actions: ActionTable,
}

impl ScrollAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named action. Returns the action previously under `name`.
    ///
    /// Names are resolved at bind time, so register actions before binding
    /// elements that use them.
    pub fn register_action(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&ElementId, &BindingSettings, f64) + 'static,
    ) -> Option<Action> {
        self.actions.insert(name.into(), Action::new(callback))
    }

    /// Bind an element.
    ///
    /// Options are normalized and validated, the element's current values are
    /// snapshotted, and the binding starts with no applied progress so the
    /// next viewport change writes every animated property. Nothing is
    /// written until then; use [`Self::bind_and_apply`] to write the initial
    /// state immediately.
    pub fn bind(
        &mut self,
        element: impl Into<ElementId>,
        options: BindingOptions,
        geometry: &dyn ElementGeometryProvider,
    ) -> Result<()> {
        let element = element.into();
        if self.bindings.contains_key(&element) {
            return Err(ConfigError::AlreadyBound(element));
        }
        let settings = options.into_settings(&self.actions)?;
        let binding = ElementBinding::new(element.clone(), settings, geometry)?;
        debug!(
            element = %element,
            animations = binding.settings().animations.len(),
            snapshot = binding.snapshot().len(),
            "element bound"
        );
        self.order.push(element.clone());
        self.bindings.insert(element, binding);
        Ok(())
    }

    /// Bind an element and write its state for the current viewport.
    ///
    /// Returns whether anything was applied.
    pub fn bind_and_apply(
        &mut self,
        element: impl Into<ElementId>,
        options: BindingOptions,
        viewport: &dyn ViewportProvider,
        geometry: &dyn ElementGeometryProvider,
        writer: &mut dyn PropertyWriter,
    ) -> Result<bool> {
        let element = element.into();
        self.bind(element.clone(), options, geometry)?;
        let area = compute_active_area(viewport);
        Ok(self
            .bindings
            .get_mut(&element)
            .is_some_and(|binding| binding.update(&area, geometry, writer)))
    }

    /// Remove an element's binding. Values already written stay as they are.
    pub fn unbind(&mut self, element: &ElementId) -> Option<ElementBinding> {
        let binding = self.bindings.remove(element)?;
        self.order.retain(|e| e != element);
        debug!(element = %element, "element unbound");
        Some(binding)
    }

    pub fn is_bound(&self, element: &ElementId) -> bool {
        self.bindings.contains_key(element)
    }

    pub fn binding(&self, element: &ElementId) -> Option<&ElementBinding> {
        self.bindings.get(element)
    }

    /// Last applied progress of an element's binding.
    pub fn last_progress(&self, element: &ElementId) -> Option<f64> {
        self.bindings.get(element).map(ElementBinding::last_progress)
    }

    /// Bound elements in binding order.
    pub fn elements(&self) -> impl Iterator<Item = &ElementId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Recompute every binding for the current viewport.
    ///
    /// Call on every scroll and resize notification. Returns the number of
    /// bindings whose progress changed and were written.
    pub fn on_viewport_changed(
        &mut self,
        viewport: &dyn ViewportProvider,
        geometry: &dyn ElementGeometryProvider,
        writer: &mut dyn PropertyWriter,
    ) -> usize {
        let area = compute_active_area(viewport);
        let mut updated = 0;
        for element in &self.order {
            if let Some(binding) = self.bindings.get_mut(element) {
                if binding.update(&area, geometry, writer) {
                    updated += 1;
                }
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::schema::{AnimationDef, AnimationKind};
    use crate::headless::{StaticDocument, StaticElement, WriteLog};
    use crate::animation::binding::UNSET_PROGRESS;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn document() -> StaticDocument {
        StaticDocument::new(1000.0, 800.0)
            .with_element("a", StaticElement::new(750.0, 0.0, 40.0, 100.0))
            .with_element("b", StaticElement::new(2000.0, 0.0, 40.0, 100.0))
    }

    fn fade() -> BindingOptions {
        BindingOptions::new().with_animation(AnimationDef::new(AnimationKind::Fade))
    }

    #[test]
    fn test_bind_and_update_in_order() {
        let doc = document();
        let mut animator = ScrollAnimator::new();
        animator.bind("b", fade(), &doc).unwrap();
        animator.bind("a", fade(), &doc).unwrap();
        assert_eq!(animator.len(), 2);

        let mut log = WriteLog::new();
        assert_eq!(animator.on_viewport_changed(&doc, &doc, &mut log), 2);
        let order: Vec<_> = log.writes().iter().map(|w| w.element.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(log.writes()[0].value, "0");
        assert_eq!(log.writes()[1].value, "0.25");
    }

    #[test]
    fn test_repeat_notification_is_idempotent() {
        let doc = document();
        let mut animator = ScrollAnimator::new();
        animator.bind("a", fade(), &doc).unwrap();

        let mut log = WriteLog::new();
        animator.on_viewport_changed(&doc, &doc, &mut log);
        assert_eq!(animator.on_viewport_changed(&doc, &doc, &mut log), 0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_double_bind_rejected() {
        let doc = document();
        let mut animator = ScrollAnimator::new();
        animator.bind("a", fade(), &doc).unwrap();
        assert_eq!(
            animator.bind("a", fade(), &doc).unwrap_err(),
            ConfigError::AlreadyBound(ElementId::from("a"))
        );
    }

    #[test]
    fn test_unbind_stops_updates() {
        let mut doc = document();
        let mut animator = ScrollAnimator::new();
        animator.bind("a", fade(), &doc).unwrap();
        let binding = animator.unbind(&ElementId::from("a")).unwrap();
        assert_eq!(binding.element().as_str(), "a");
        assert!(animator.is_empty());
        assert!(animator.unbind(&ElementId::from("a")).is_none());

        doc.scroll_to(100.0);
        let mut log = WriteLog::new();
        assert_eq!(animator.on_viewport_changed(&doc, &doc, &mut log), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_named_action_receives_progress() {
        let doc = document();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut animator = ScrollAnimator::new();
        assert!(
            animator
                .register_action("record", move |element, settings, progress| {
                    sink.borrow_mut()
                        .push((element.to_string(), settings.rep.end, progress));
                })
                .is_none()
        );
        let options = BindingOptions::new().with_animation(
            AnimationDef::new(AnimationKind::Custom).with_action_named("record"),
        );
        animator.bind("a", options, &doc).unwrap();

        let mut log = WriteLog::new();
        animator.on_viewport_changed(&doc, &doc, &mut log);
        assert!(log.is_empty());
        assert_eq!(*seen.borrow(), vec![("a".to_string(), 200.0, 0.25)]);
    }

    #[test]
    fn test_bind_and_apply_writes_initial_state() {
        let doc = document();
        let mut animator = ScrollAnimator::new();
        animator.bind("b", fade(), &doc).unwrap();

        let mut log = WriteLog::new();
        assert!(animator.bind_and_apply("a", fade(), &doc, &doc, &mut log).unwrap());
        assert_eq!(log.len(), 1);
        assert_eq!(log.last_value(&ElementId::from("a"), "opacity"), Some("0.25"));
        assert_eq!(animator.last_progress(&ElementId::from("a")), Some(0.25));
        assert_eq!(animator.last_progress(&ElementId::from("b")), Some(UNSET_PROGRESS));

        // Already applied: the next notification only writes the other binding.
        assert_eq!(animator.on_viewport_changed(&doc, &doc, &mut log), 1);
        assert_eq!(log.len(), 2);
    }
}
