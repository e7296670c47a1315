use web_sys::window;

use zaai_widget_core::{DEVICE_ID_STORAGE_KEY, DeviceIdStore};

/// Device identity store backed by `window.localStorage`.
///
/// Hosts that deny storage access (sandboxed iframes, privacy modes)
/// behave as if no device id were stored; writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LocalStorageDeviceIdStore;

impl DeviceIdStore for LocalStorageDeviceIdStore {
    fn load_device_id(&self) -> Option<String> {
        let storage = window()?.local_storage().ok()??;
        storage.get_item(DEVICE_ID_STORAGE_KEY).ok()?
    }

    fn store_device_id(&self, device_id: &str) {
        let Some(storage) = window().and_then(|window| window.local_storage().ok().flatten())
        else {
            return;
        };
        let _ = storage.set_item(DEVICE_ID_STORAGE_KEY, device_id);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;

    #[wasm_bindgen_test]
    fn round_trips_the_device_id() {
        let store = LocalStorageDeviceIdStore;
        store.store_device_id("dev_123");
        assert_eq!(store.load_device_id().as_deref(), Some("dev_123"));
    }
}
