#![allow(dead_code)]

use crosshair_overlay::controller::{ControllerOptions, WindowModeController};
use crosshair_overlay::error::{CrosshairError, Result};
use crosshair_overlay::hotkey::{
    HotkeyBackend, HotkeyBinding, HotkeyCallback, HotkeyRegistrar, RegistrationHandle,
};
use crosshair_overlay::image_source::{Bitmap, ImageSource};
use crosshair_overlay::window_style::{WindowHandle, WindowStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct StyleState {
    pub applied: bool,
    pub fail_apply: bool,
    pub fail_remove: bool,
    pub calls: Vec<&'static str>,
}

#[derive(Clone, Default)]
pub struct MockStyle(pub Arc<Mutex<StyleState>>);

impl MockStyle {
    pub fn calls(&self, name: &str) -> usize {
        self.0.lock().unwrap().calls.iter().filter(|c| **c == name).count()
    }

    pub fn applied(&self) -> bool {
        self.0.lock().unwrap().applied
    }
}

impl WindowStyle for MockStyle {
    fn apply_click_through(&mut self, _window: WindowHandle) -> Result<()> {
        let mut s = self.0.lock().unwrap();
        s.calls.push("apply");
        if s.fail_apply {
            return Err(CrosshairError::PlatformStyle { code: 5 });
        }
        s.applied = true;
        Ok(())
    }

    fn remove_click_through(&mut self, _window: WindowHandle) -> Result<()> {
        let mut s = self.0.lock().unwrap();
        s.calls.push("remove");
        if s.fail_remove {
            return Err(CrosshairError::PlatformStyle { code: 5 });
        }
        s.applied = false;
        Ok(())
    }
}

#[derive(Default)]
pub struct HotkeyState {
    next_id: u32,
    pub live: HashMap<u32, (String, HotkeyCallback)>,
    /// Labels owned by some other application.
    pub taken: Vec<String>,
    pub fail_unregister: bool,
}

#[derive(Clone, Default)]
pub struct MockHotkeys(pub Arc<Mutex<HotkeyState>>);

impl MockHotkeys {
    pub fn live_labels(&self) -> Vec<String> {
        let mut labels: Vec<_> = self
            .0
            .lock()
            .unwrap()
            .live
            .values()
            .map(|(l, _)| l.clone())
            .collect();
        labels.sort();
        labels
    }

    /// Simulate the user pressing `label`. Returns whether anything fired.
    pub fn press(&self, label: &str) -> bool {
        let cb = self
            .0
            .lock()
            .unwrap()
            .live
            .values()
            .find(|(l, _)| l == label)
            .map(|(_, cb)| cb.clone());
        match cb {
            Some(cb) => {
                cb();
                true
            }
            None => false,
        }
    }
}

impl HotkeyBackend for MockHotkeys {
    fn register(
        &mut self,
        binding: &HotkeyBinding,
        callback: HotkeyCallback,
    ) -> Result<RegistrationHandle> {
        let mut s = self.0.lock().unwrap();
        if s.taken.iter().any(|t| t == binding.label()) {
            return Err(CrosshairError::HotkeyConflict {
                binding: binding.label().to_string(),
            });
        }
        s.next_id += 1;
        let id = s.next_id;
        s.live.insert(id, (binding.label().to_string(), callback));
        Ok(RegistrationHandle::new(id))
    }

    fn unregister(&mut self, handle: RegistrationHandle) -> Result<()> {
        let mut s = self.0.lock().unwrap();
        if s.fail_unregister {
            return Err(CrosshairError::HotkeyRegistration {
                binding: String::new(),
                code: 1412,
            });
        }
        s.live.remove(&handle.id());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockImages {
    pub files: Arc<Mutex<HashMap<PathBuf, Bitmap>>>,
    pub default_fails: Arc<Mutex<bool>>,
}

/// Bitmap standing in for the bundled crosshair.
pub fn default_bitmap() -> Bitmap {
    Bitmap::filled(100, 100, [0, 255, 0, 255])
}

impl MockImages {
    pub fn add(&self, path: &str, bitmap: Bitmap) {
        self.files.lock().unwrap().insert(PathBuf::from(path), bitmap);
    }
}

impl ImageSource for MockImages {
    fn load(&self, path: &Path) -> Result<Bitmap> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| CrosshairError::ResourceNotFound(path.to_path_buf()))
    }

    fn load_default(&self) -> Result<Bitmap> {
        if *self.default_fails.lock().unwrap() {
            return Err(CrosshairError::ResourceNotFound(PathBuf::from("crosshair.png")));
        }
        Ok(default_bitmap())
    }
}

pub type TestController = WindowModeController<MockStyle, MockHotkeys, MockImages>;

pub struct Harness {
    pub controller: TestController,
    pub style: MockStyle,
    pub hotkeys: MockHotkeys,
    pub images: MockImages,
    pub toggles: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_options(ControllerOptions::default())
    }

    pub fn with_options(options: ControllerOptions) -> Self {
        let style = MockStyle::default();
        let hotkeys = MockHotkeys::default();
        let images = MockImages::default();
        let toggles = Arc::new(AtomicUsize::new(0));
        let counter = toggles.clone();
        let callback: HotkeyCallback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let controller = WindowModeController::new(
            WindowHandle(0x1234),
            style.clone(),
            HotkeyRegistrar::new(hotkeys.clone(), callback),
            images.clone(),
            options,
        );
        Self {
            controller,
            style,
            hotkeys,
            images,
            toggles,
        }
    }

    pub fn toggles(&self) -> usize {
        self.toggles.load(Ordering::SeqCst)
    }
}
