use crate::geometry::ScreenRect;
use crate::window_style::WindowHandle;

/// Map a key token such as `"A"`, `"F5"` or `"SPACE"` to its Win32 virtual key
/// code.
pub fn virtual_key_from_string(key: &str) -> Option<u32> {
    let upper = key.to_ascii_uppercase();
    if let [c] = upper.as_bytes() {
        // Letter and digit virtual keys share their ASCII codes.
        return (c.is_ascii_uppercase() || c.is_ascii_digit()).then_some(*c as u32);
    }
    if let Some(n) = upper.strip_prefix("NUMPAD").and_then(|d| d.parse::<u32>().ok()) {
        return (n <= 9).then_some(0x60 + n);
    }
    if let Some(n) = upper.strip_prefix('F').and_then(|d| d.parse::<u32>().ok()) {
        return (1..=24).contains(&n).then_some(0x6F + n);
    }
    match upper.as_str() {
        "NUMPADMULTIPLY" => Some(0x6A),
        "NUMPADADD" => Some(0x6B),
        "NUMPADSUBTRACT" => Some(0x6D),
        "NUMPADDOT" => Some(0x6E),
        "NUMPADDIVIDE" => Some(0x6F),

        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),

        "BACKSPACE" => Some(0x08),
        "TAB" => Some(0x09),
        "ENTER" => Some(0x0D),
        "PAUSE" => Some(0x13),
        "CAPSLOCK" => Some(0x14),
        "ESCAPE" => Some(0x1B),
        "SPACE" => Some(0x20),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "END" => Some(0x23),
        "HOME" => Some(0x24),
        "PRINTSCREEN" => Some(0x2C),
        "INSERT" => Some(0x2D),
        "DELETE" => Some(0x2E),
        "NUMLOCK" => Some(0x90),
        "SCROLLLOCK" => Some(0x91),

        _ => None,
    }
}

/// Full bounds of the primary monitor in physical pixels.
pub fn primary_screen_bounds() -> Option<ScreenRect> {
    #[cfg(target_os = "windows")]
    {
        use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        (w > 0 && h > 0).then(|| ScreenRect::new(0, 0, w, h))
    }

    #[cfg(not(target_os = "windows"))]
    {
        None
    }
}

/// Primary monitor area not covered by the taskbar, in physical pixels.
pub fn primary_work_area() -> Option<ScreenRect> {
    #[cfg(target_os = "windows")]
    {
        use windows::Win32::Foundation::RECT;
        use windows::Win32::UI::WindowsAndMessaging::{
            SystemParametersInfoW, SPI_GETWORKAREA, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
        };
        let mut rc = RECT::default();
        let ok = unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut rc as *mut RECT as *mut core::ffi::c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        }
        .is_ok();
        ok.then(|| ScreenRect::new(rc.left, rc.top, rc.right, rc.bottom))
            .or_else(primary_screen_bounds)
    }

    #[cfg(not(target_os = "windows"))]
    {
        None
    }
}

/// Extract the native window handle from anything eframe hands out
/// (`CreationContext` or `Frame`).
pub fn window_handle_of(source: &impl raw_window_handle::HasWindowHandle) -> WindowHandle {
    use raw_window_handle::RawWindowHandle;
    source
        .window_handle()
        .ok()
        .and_then(|wh| match wh.as_raw() {
            RawWindowHandle::Win32(handle) => Some(WindowHandle(handle.hwnd.get())),
            _ => None,
        })
        .unwrap_or_default()
}
