//! Click-through and topmost window styling.
//!
//! The controller only talks to the [`WindowStyle`] trait. On Windows the
//! extended style bits are flipped directly with `SetWindowLongPtrW`; other
//! platforms get [`UnsupportedWindowStyle`], which reports an explicit error
//! rather than pretending the window became click-through.

use crate::error::{CrosshairError, Result};

pub const EX_LAYERED: u32 = 0x0008_0000;
pub const EX_TRANSPARENT: u32 = 0x0000_0020;
pub const EX_NOACTIVATE: u32 = 0x0800_0000;

/// Raw OS window handle (an `HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

pub trait WindowStyle {
    /// Let mouse input pass through `window` and keep it above normal windows
    /// without activating it. Calling this repeatedly yields the same bits.
    fn apply_click_through(&mut self, window: WindowHandle) -> Result<()>;

    /// Restore normal input handling. The layered bit is left alone.
    fn remove_click_through(&mut self, window: WindowHandle) -> Result<()>;
}

/// Extended style bits for a click-through window derived from `current`.
pub fn click_through_ex_style(current: u32, no_activate: bool) -> u32 {
    let mut style = current | EX_LAYERED | EX_TRANSPARENT;
    if no_activate {
        style |= EX_NOACTIVATE;
    }
    style
}

/// Extended style bits for a window that accepts input again.
pub fn interactive_ex_style(current: u32) -> u32 {
    current & !(EX_TRANSPARENT | EX_NOACTIVATE)
}

#[cfg(target_os = "windows")]
mod platform {
    use super::{click_through_ex_style, interactive_ex_style, WindowHandle, WindowStyle};
    use crate::error::{CrosshairError, Result};
    use windows::Win32::Foundation::{GetLastError, SetLastError, HWND, WIN32_ERROR};
    use windows::Win32::UI::WindowsAndMessaging::{
        GetWindowLongPtrW, SetWindowLongPtrW, SetWindowPos, GWL_EXSTYLE, HWND_TOPMOST,
        SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    };

    /// Window style adapter backed by the Win32 extended window style.
    #[derive(Debug, Clone)]
    pub struct Win32WindowStyle {
        pub no_activate: bool,
    }

    impl Default for Win32WindowStyle {
        fn default() -> Self {
            Self { no_activate: true }
        }
    }

    fn last_error() -> CrosshairError {
        let err = unsafe { GetLastError() };
        CrosshairError::PlatformStyle {
            code: err.to_hresult().0,
        }
    }

    fn hwnd(window: WindowHandle) -> Result<HWND> {
        if window.is_null() {
            return Err(CrosshairError::PlatformStyle {
                code: windows::Win32::Foundation::ERROR_INVALID_WINDOW_HANDLE
                    .to_hresult()
                    .0,
            });
        }
        Ok(HWND(window.0 as *mut core::ffi::c_void))
    }

    fn write_ex_style(hwnd: HWND, style: u32) -> Result<()> {
        unsafe {
            SetLastError(WIN32_ERROR(0));
            let previous = SetWindowLongPtrW(hwnd, GWL_EXSTYLE, style as isize);
            if previous == 0 && GetLastError().0 != 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }

    fn read_ex_style(hwnd: HWND) -> Result<u32> {
        unsafe {
            SetLastError(WIN32_ERROR(0));
            let style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
            if style == 0 && GetLastError().0 != 0 {
                return Err(last_error());
            }
            Ok(style as u32)
        }
    }

    impl WindowStyle for Win32WindowStyle {
        fn apply_click_through(&mut self, window: WindowHandle) -> Result<()> {
            let hwnd = hwnd(window)?;
            let current = read_ex_style(hwnd)?;
            let next = click_through_ex_style(current, self.no_activate);
            if next != current {
                write_ex_style(hwnd, next)?;
            }
            unsafe {
                SetWindowPos(
                    hwnd,
                    HWND_TOPMOST,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_FRAMECHANGED,
                )
            }
            .map_err(|e| CrosshairError::PlatformStyle { code: e.code().0 })?;
            tracing::debug!(style = %format!("{next:#x}"), "click-through applied");
            Ok(())
        }

        fn remove_click_through(&mut self, window: WindowHandle) -> Result<()> {
            let hwnd = hwnd(window)?;
            let current = read_ex_style(hwnd)?;
            let next = interactive_ex_style(current);
            if next != current {
                write_ex_style(hwnd, next)?;
                unsafe {
                    SetWindowPos(
                        hwnd,
                        HWND::default(),
                        0,
                        0,
                        0,
                        0,
                        SWP_NOMOVE
                            | SWP_NOSIZE
                            | SWP_NOACTIVATE
                            | SWP_FRAMECHANGED
                            | SWP_NOZORDER,
                    )
                }
                .map_err(|e| CrosshairError::PlatformStyle { code: e.code().0 })?;
            }
            tracing::debug!(style = %format!("{next:#x}"), "click-through removed");
            Ok(())
        }
    }

}

#[cfg(target_os = "windows")]
pub use platform::Win32WindowStyle;

/// Adapter for platforms without a click-through window style.
#[derive(Debug, Default, Clone)]
pub struct UnsupportedWindowStyle;

impl WindowStyle for UnsupportedWindowStyle {
    fn apply_click_through(&mut self, _window: WindowHandle) -> Result<()> {
        Err(CrosshairError::Unsupported("click-through windows"))
    }

    fn remove_click_through(&mut self, _window: WindowHandle) -> Result<()> {
        Err(CrosshairError::Unsupported("click-through windows"))
    }
}

#[cfg(target_os = "windows")]
pub type PlatformWindowStyle = Win32WindowStyle;
#[cfg(not(target_os = "windows"))]
pub type PlatformWindowStyle = UnsupportedWindowStyle;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_through_is_idempotent() {
        let base = 0x0000_0100;
        let once = click_through_ex_style(base, true);
        assert_eq!(click_through_ex_style(once, true), once);
        assert_ne!(once & EX_TRANSPARENT, 0);
        assert_ne!(once & EX_LAYERED, 0);
        assert_ne!(once & EX_NOACTIVATE, 0);
    }

    #[test]
    fn interactive_keeps_layered_bit() {
        let style = click_through_ex_style(0, false);
        let restored = interactive_ex_style(style);
        assert_eq!(restored & EX_TRANSPARENT, 0);
        assert_ne!(restored & EX_LAYERED, 0);
    }
}
