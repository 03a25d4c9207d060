use std::path::PathBuf;
use std::sync::mpsc;

use objc2::{
    rc::{autoreleasepool, Retained},
    runtime::AnyObject,
    MainThreadMarker,
};
use objc2_app_kit::{NSSharingServicePicker, NSView};
use objc2_core_foundation::{CGPoint, CGRect, CGSize};
use objc2_foundation::{NSArray, NSString, NSURL};
use raw_window_handle::{HasWindowHandle, RawWindowHandle, WindowHandle};
use tauri::{Runtime, Window};

use crate::models::{CanShareResult, DirectiveBody, ShareDirective};
use crate::Error;

pub fn can_share() -> Result<CanShareResult, Error> {
    Ok(CanShareResult { value: true })
}

/// Shows `NSSharingServicePicker` anchored to the centre of the window.
///
/// The picker has no title or subject slot; both are dropped here.
pub fn present_chooser<R: Runtime>(
    window: Window<R>,
    directive: &ShareDirective,
    _title: Option<&str>,
) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    let window_clone = window.clone();
    let text = match &directive.body {
        DirectiveBody::Text { text } => Some(text.clone()),
        _ => None,
    };
    let files: Vec<PathBuf> = directive
        .references()
        .iter()
        .map(|reference| reference.path().to_path_buf())
        .collect();

    window.run_on_main_thread(move || {
        let result = (|| -> Result<(), Error> {
            let mtm = MainThreadMarker::new()
                .ok_or_else(|| Error::NativeApi("Not on the main thread.".to_string()))?;
            let ns_view = get_ns_view(&window_clone)?;

            let mut items: Vec<Retained<AnyObject>> = Vec::new();
            if let Some(text) = &text {
                let string = NSString::from_str(text);
                items.push(Retained::into_super(Retained::into_super(string)));
            }
            for path in &files {
                let path_str = path.to_string_lossy();
                let url = unsafe { NSURL::fileURLWithPath(&NSString::from_str(&path_str)) };
                items.push(Retained::into_super(Retained::into_super(url)));
            }
            if items.is_empty() {
                return Err(Error::EmptyPayload);
            }

            autoreleasepool(|_pool| {
                let items_array = NSArray::from_retained_slice(&items);
                let picker = unsafe {
                    NSSharingServicePicker::initWithItems(
                        NSSharingServicePicker::alloc(mtm),
                        &items_array,
                    )
                };

                let bounds = ns_view.bounds();
                unsafe {
                    picker.showRelativeToRect_ofView_preferredEdge(
                        CGRect {
                            origin: CGPoint {
                                x: bounds.size.width / 2.0,
                                y: bounds.size.height / 2.0,
                            },
                            size: CGSize {
                                width: 0.0,
                                height: 0.0,
                            },
                        },
                        &ns_view,
                        objc2_foundation::NSRectEdge::NSMinYEdge,
                    );
                }
            });
            Ok(())
        })();
        tx.send(result).ok();
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

/// Retrieves the native `NSView` behind the Tauri window.
fn get_ns_view<R: Runtime>(window: &Window<R>) -> Result<Retained<NSView>, Error> {
    let window_handle: WindowHandle<'_> = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;
    if let RawWindowHandle::AppKit(handle) = window_handle.as_raw() {
        let ns_view_ptr = handle.ns_view.as_ptr();
        unsafe { Retained::retain(ns_view_ptr.cast::<NSView>()) }
            .ok_or_else(|| Error::NativeApi("Window has no NSView.".to_string()))
    } else {
        Err(Error::NativeApi(
            "Unsupported window handle type on macOS.".to_string(),
        ))
    }
}
