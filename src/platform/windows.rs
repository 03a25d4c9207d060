use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use log::warn;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tauri::{Runtime, Window};
use windows::ApplicationModel::DataTransfer::{DataRequestedEventArgs, DataTransferManager};
use windows::Storage::IStorageItem;
use windows::{
    core::{Interface, HSTRING},
    Foundation::TypedEventHandler,
    Storage::StorageFile,
    Win32::{
        Foundation::HWND,
        System::WinRT::{RoInitialize, RO_INIT_SINGLETHREADED},
        UI::Shell::IDataTransferManagerInterop,
    },
};
use windows_collections::IIterable;

use crate::models::{CanShareResult, DirectiveBody, ShareDirective};
use crate::Error;

// DataPackage requires a non-empty title.
const DEFAULT_TITLE: &str = "Share";

// Keeps the DataTransferManager and its event token alive until the share UI
// asks for data. Only touched on the main thread.
thread_local! {
    static SHARE_STATE: RefCell<Option<(DataTransferManager, i64)>> = RefCell::new(None);
}

impl From<windows::core::Error> for Error {
    fn from(err: windows::core::Error) -> Self {
        Error::NativeApi(err.message().to_string())
    }
}

/// Owned copy of what the share UI needs, movable onto the main thread.
struct SharePayload {
    title: String,
    subject: Option<String>,
    text: Option<String>,
    files: Vec<PathBuf>,
}

impl SharePayload {
    fn new(directive: &ShareDirective, title: Option<&str>) -> Self {
        let text = match &directive.body {
            DirectiveBody::Text { text } => Some(text.clone()),
            _ => None,
        };
        Self {
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            subject: directive.subject.clone(),
            text,
            files: directive
                .references()
                .iter()
                .map(|reference| reference.path().to_path_buf())
                .collect(),
        }
    }
}

pub fn can_share() -> Result<CanShareResult, Error> {
    Ok(CanShareResult { value: true })
}

pub fn present_chooser<R: Runtime>(
    window: Window<R>,
    directive: &ShareDirective,
    title: Option<&str>,
) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    let win_clone = window.clone();
    let payload = Arc::new(SharePayload::new(directive, title));

    window.run_on_main_thread(move || {
        let result = (|| -> Result<(), Error> {
            initialize_winrt_thread()?;
            let hwnd = get_hwnd(&win_clone)?;
            let (dtm, interop) = get_data_transfer_manager(hwnd)?;

            let data_requested_handler = TypedEventHandler::new({
                let payload = payload.clone();
                move |_, args: windows::core::Ref<'_, DataRequestedEventArgs>| -> windows::core::Result<()> {
                    if let Some(request_args) = (*args).as_ref() {
                        let request = request_args.Request()?;
                        let data = request.Data()?;
                        let properties = data.Properties()?;

                        properties.SetTitle(&HSTRING::from(payload.title.as_str()))?;
                        if let Some(subject) = &payload.subject {
                            properties.SetDescription(&HSTRING::from(subject.as_str()))?;
                        }
                        if let Some(text) = &payload.text {
                            data.SetText(&HSTRING::from(text.as_str()))?;
                        }

                        if !payload.files.is_empty() {
                            let deferral = request.GetDeferral()?;
                            let data_clone = data.clone();
                            let files = payload.files.clone();

                            tauri::async_runtime::spawn(async move {
                                let storage_items = open_storage_items(&files);
                                if !storage_items.is_empty() {
                                    let iterable_items: Result<IIterable<IStorageItem>, _> =
                                        storage_items.into_iter().map(Some).collect::<Vec<_>>().try_into();
                                    match iterable_items {
                                        Ok(items) => {
                                            if let Err(e) = data_clone.SetStorageItemsReadOnly(&items) {
                                                warn!("Failed to set storage items on data package: {}", e);
                                            }
                                        }
                                        Err(e) => warn!("Failed to convert storage items: {}", e),
                                    }
                                }
                                deferral.Complete()?;
                                Ok::<(), windows::core::Error>(())
                            });
                        }

                        SHARE_STATE.with(|state| {
                            if let Some((manager, token)) = state.borrow_mut().take() {
                                let _ = manager.RemoveDataRequested(token);
                            }
                        });
                    }
                    Ok(())
                }
            });

            let token = dtm.DataRequested(&data_requested_handler)?;
            SHARE_STATE.with(|state| {
                *state.borrow_mut() = Some((dtm, token));
            });

            unsafe { interop.ShowShareUIForWindow(hwnd) }?;
            Ok(())
        })();
        tx.send(result).ok();
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

/// Opens each file as a storage item, skipping the ones Windows refuses.
fn open_storage_items(files: &[PathBuf]) -> Vec<IStorageItem> {
    let mut items = Vec::with_capacity(files.len());
    for path in files {
        let opened = StorageFile::GetFileFromPathAsync(&HSTRING::from(&*path.to_string_lossy()))
            .and_then(|op| op.get())
            .and_then(|file| file.cast::<IStorageItem>());
        match opened {
            Ok(item) => items.push(item),
            Err(e) => warn!("Failed to open {} for sharing: {}", path.display(), e),
        }
    }
    items
}

/// Initializes the Windows Runtime on the current thread.
fn initialize_winrt_thread() -> Result<(), Error> {
    // S_FALSE on a second call is not an error.
    unsafe { RoInitialize(RO_INIT_SINGLETHREADED) }
        .map_err(|e| Error::NativeApi(format!("Failed to initialize WinRT: {}", e)))
}

fn get_hwnd<R: Runtime>(window: &Window<R>) -> Result<HWND, Error> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut std::ffi::c_void)),
        _ => Err(Error::NativeApi("Unsupported window handle type".to_string())),
    }
}

/// Desktop (non-UWP) apps must reach the DataTransferManager through the
/// interop interface for their HWND.
fn get_data_transfer_manager(
    hwnd: HWND,
) -> Result<(DataTransferManager, IDataTransferManagerInterop), Error> {
    let interop = windows::core::factory::<DataTransferManager, IDataTransferManagerInterop>()?;
    let dtm = unsafe { interop.GetForWindow(hwnd) }?;
    Ok((dtm, interop))
}
