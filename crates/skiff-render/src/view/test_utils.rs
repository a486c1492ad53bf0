//! Test doubles for the view capability contract and the script boundary.

use super::traits::{MethodCallback, RenderView};
use crate::bridge::{ForeignDelegate, NativeHandle, SurfaceBinder, SurfaceHandle};
use crate::tree::{Padding, Rect, Tag};
use crate::value::{PropKey, PropMap, PropValue};
use crate::wire;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Install a fmt subscriber so `RUST_LOG` surfaces engine logs while a
/// test runs. Safe to call from every test; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// View that records every capability call into shared buffers, so tests
/// can inspect what the manager did after ownership moved into the
/// registry.
pub struct RecordingView {
    handle: NativeHandle,
    log: Rc<RefCell<Vec<String>>>,
    props: Rc<RefCell<PropMap>>,
    events: RefCell<HashSet<PropKey>>,
}

impl RecordingView {
    pub fn new(handle: NativeHandle) -> Self {
        Self::with_buffers(
            handle,
            Rc::new(RefCell::new(Vec::new())),
            Rc::new(RefCell::new(PropMap::new())),
        )
    }

    /// Wire the view to buffers owned by the test, so state stays readable
    /// after the view moves into the registry.
    pub fn with_buffers(
        handle: NativeHandle,
        log: Rc<RefCell<Vec<String>>>,
        props: Rc<RefCell<PropMap>>,
    ) -> Self {
        Self {
            handle,
            log,
            props,
            events: RefCell::new(HashSet::new()),
        }
    }

    /// Shared call log; keep a clone before handing the view to the manager.
    pub fn log(&self) -> Rc<RefCell<Vec<String>>> {
        self.log.clone()
    }

    /// Shared prop store; keep a clone before handing the view to the manager.
    pub fn props(&self) -> Rc<RefCell<PropMap>> {
        self.props.clone()
    }
}

impl RenderView for RecordingView {
    fn set_prop(&mut self, key: &str, value: &PropValue) -> bool {
        self.log.borrow_mut().push(format!("set_prop {}={:?}", key, value));
        self.props.borrow_mut().insert(key.into(), value.clone());
        true
    }

    fn on_props_applied(&mut self) {
        self.log.borrow_mut().push("props_applied".to_string());
    }

    fn set_frame(&mut self, frame: Rect, padding: Padding) {
        self.log.borrow_mut().push(format!(
            "set_frame {},{},{},{} pad {},{},{},{}",
            frame.left,
            frame.top,
            frame.width,
            frame.height,
            padding.left,
            padding.top,
            padding.right,
            padding.bottom
        ));
    }

    fn update_event_listeners(&mut self, props: &PropMap) {
        let mut events = self.events.borrow_mut();
        for (event, value) in props {
            self.log
                .borrow_mut()
                .push(format!("event {}={}", event, value.is_truthy()));
            if value.is_truthy() {
                events.insert(event.clone());
            } else {
                events.remove(event);
            }
        }
    }

    fn is_event_registered(&self, event: &str) -> bool {
        self.events.borrow().contains(event)
    }

    fn invoke_method(&mut self, method: &str, args: &[PropValue], callback: Option<MethodCallback>) {
        self.log
            .borrow_mut()
            .push(format!("invoke {} argc={}", method, args.len()));
        if let Some(callback) = callback {
            callback(PropValue::Str("ok".into()));
        }
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}

/// One recorded cross-boundary call, prop buffers already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum DelegateCall {
    CreateView {
        root_tag: Tag,
        tag: Tag,
        view_type: String,
    },
    UpdateProps {
        tag: Tag,
        props: PropValue,
        deleted_keys: Vec<PropKey>,
    },
    UpdateEventListeners {
        tag: Tag,
        props: PropValue,
    },
    SetFrame {
        tag: Tag,
        frame: Rect,
    },
}

/// Delegate double: hands out predictable handles and records every call.
/// Types listed in `fail_types` refuse creation, for exercising the
/// boundary-failure path.
#[derive(Default)]
pub struct RecordingDelegate {
    pub calls: RefCell<Vec<DelegateCall>>,
    pub fail_types: RefCell<HashSet<String>>,
}

impl RecordingDelegate {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn fail_on(&self, view_type: &str) {
        self.fail_types.borrow_mut().insert(view_type.to_string());
    }

    pub fn take_calls(&self) -> Vec<DelegateCall> {
        std::mem::take(&mut self.calls.borrow_mut())
    }
}

impl ForeignDelegate for RecordingDelegate {
    fn create_view(&self, root_tag: Tag, tag: Tag, view_type: &str) -> Option<NativeHandle> {
        self.calls.borrow_mut().push(DelegateCall::CreateView {
            root_tag,
            tag,
            view_type: view_type.to_string(),
        });
        if self.fail_types.borrow().contains(view_type) {
            return None;
        }
        Some(NativeHandle(1_000 + u64::from(tag.0)))
    }

    fn update_props(&self, _root_tag: Tag, tag: Tag, props_buffer: &[u8], deleted_keys: &[PropKey]) {
        let props = wire::decode(props_buffer).expect("delegate received undecodable props");
        self.calls.borrow_mut().push(DelegateCall::UpdateProps {
            tag,
            props,
            deleted_keys: deleted_keys.to_vec(),
        });
    }

    fn update_event_listeners(&self, _root_tag: Tag, tag: Tag, props_buffer: &[u8]) {
        let props = wire::decode(props_buffer).expect("delegate received undecodable props");
        self.calls
            .borrow_mut()
            .push(DelegateCall::UpdateEventListeners { tag, props });
    }

    fn set_frame(&self, _root_tag: Tag, tag: Tag, frame: Rect) {
        self.calls
            .borrow_mut()
            .push(DelegateCall::SetFrame { tag, frame });
    }
}

/// Surface binder double recording attach/detach pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    Attach(SurfaceHandle, NativeHandle),
    Detach(SurfaceHandle, NativeHandle),
}

#[derive(Default)]
pub struct RecordingSurfaces {
    pub calls: RefCell<Vec<SurfaceCall>>,
}

impl RecordingSurfaces {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn take_calls(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls.borrow_mut())
    }
}

impl SurfaceBinder for RecordingSurfaces {
    fn attach(&self, surface: SurfaceHandle, widget: NativeHandle) {
        self.calls
            .borrow_mut()
            .push(SurfaceCall::Attach(surface, widget));
    }

    fn detach(&self, surface: SurfaceHandle, widget: NativeHandle) {
        self.calls
            .borrow_mut()
            .push(SurfaceCall::Detach(surface, widget));
    }
}
