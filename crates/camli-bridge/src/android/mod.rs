// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each store maps onto
// `Context.getSharedPreferences(name, MODE_PRIVATE)`, so files written here
// are the same ones the Java side of the app reads.
//
// ## Architecture notes
//
// No JNI state is cached on the Rust side. Every call attaches the current
// thread, fetches the SharedPreferences object again (the platform keeps it
// cached per name), and releases local references when the guard drops.
// A store handle copies `getAll()` once when opened and answers reads from
// that snapshot, like `SharedPreferences` itself does on the Java side.
// Writes update the snapshot, then go through `SharedPreferences.Editor`,
// finishing with `apply()` or `commit()` depending on the requested
// `WriteMode`.

#![cfg(target_os = "android")]

use std::collections::{BTreeMap, BTreeSet};

use jni::JNIEnv;
use jni::objects::{JObject, JObjectArray, JString, JValue};

use camli_core::error::{CamliError, Result};
use camli_prefs::store::apply_edits;
use camli_prefs::{Edit, PrefValue, PreferenceStore, StoreProvider, WriteMode};

use crate::traits::PlatformBridge;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// `Context.MODE_PRIVATE`.
const MODE_PRIVATE: i32 = 0;

/// Run `f` with an attached [`JNIEnv`] and the hosting Android `Context`.
///
/// The `JavaVM*` and context pointers come from `ndk_context`, set by
/// `android_main` or `ANativeActivity_onCreate`.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| CamliError::Bridge(format!("failed to obtain JavaVM: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(CamliError::Bridge(
            "Android context is null; native activity not initialised".into(),
        ));
    }

    let mut env = vm
        .attach_current_thread()
        .map_err(|e| CamliError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Context.
    let context = unsafe { JObject::from_raw(ptr.cast()) };
    f(&mut *env, &context)
}

/// Convenience: map any `jni::errors::Error` into `CamliError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> CamliError {
    CamliError::Bridge(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the preference bridge.
///
/// Zero-sized; all state lives on the Java side.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI. The first JNI call happens lazily when
    /// a store is read or written.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreProvider for AndroidBridge {
    fn open_store(&self, name: &str) -> Result<Box<dyn PreferenceStore>> {
        Ok(Box::new(AndroidPreferenceStore::open(name)?))
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn storage_location(&self) -> String {
        "SharedPreferences (MODE_PRIVATE)".into()
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore — android.content.SharedPreferences
// ---------------------------------------------------------------------------

/// One named `SharedPreferences` file.
pub struct AndroidPreferenceStore {
    name: String,
    cache: BTreeMap<String, PrefValue>,
}

impl AndroidPreferenceStore {
    /// Open store `name`, copying its current entries across JNI once.
    pub fn open(name: &str) -> Result<Self> {
        camli_prefs::backend::validate_store_name(name)?;
        let cache = with_env(|env, context| load_entries(env, context, name))?;
        tracing::debug!(store = name, entries = cache.len(), "Android: SharedPreferences opened");
        Ok(Self {
            name: name.to_string(),
            cache,
        })
    }

    /// Re-read the entries, picking up writes made by the Java side.
    pub fn reload(&mut self) -> Result<()> {
        self.cache = with_env(|env, context| load_entries(env, context, &self.name))?;
        Ok(())
    }
}

impl PreferenceStore for AndroidPreferenceStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<PrefValue> {
        self.cache.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.cache.keys().cloned().collect()
    }

    fn write(&mut self, edits: &[Edit], mode: WriteMode) -> Result<()> {
        if !apply_edits(&mut self.cache, edits) {
            return Ok(());
        }

        with_env(|env, context| {
            let prefs = shared_preferences(env, context, &self.name)?;

            // -- editor = prefs.edit() ------------------------------------------
            let editor: JObject = env
                .call_method(
                    &prefs,
                    "edit",
                    "()Landroid/content/SharedPreferences$Editor;",
                    &[],
                )
                .map_err(|e| jni_err("SharedPreferences.edit", e))?
                .l()
                .map_err(|e| jni_err("edit->l", e))?;

            // Editor.clear() is applied first by the platform, whatever its
            // position in the batch.
            if edits.iter().any(|e| matches!(e, Edit::Clear)) {
                env.call_method(
                    &editor,
                    "clear",
                    "()Landroid/content/SharedPreferences$Editor;",
                    &[],
                )
                .map_err(|e| jni_err("editor.clear", e))?;
            }

            for edit in edits {
                match edit {
                    Edit::Put(key, value) => put_value(env, &editor, key, value)?,
                    Edit::Remove(key) => {
                        let j_key: JString = env
                            .new_string(key)
                            .map_err(|e| jni_err("new_string(key)", e))?;
                        env.call_method(
                            &editor,
                            "remove",
                            "(Ljava/lang/String;)Landroid/content/SharedPreferences$Editor;",
                            &[JValue::Object(&j_key)],
                        )
                        .map_err(|e| jni_err("editor.remove", e))?;
                    }
                    Edit::Clear => {}
                }
            }

            match mode {
                // -- editor.apply() (async write, non-blocking) -----------------
                WriteMode::Apply => {
                    env.call_method(&editor, "apply", "()V", &[])
                        .map_err(|e| jni_err("editor.apply", e))?;
                }
                // -- editor.commit() (synchronous, reports success) -------------
                WriteMode::Commit => {
                    let ok = env
                        .call_method(&editor, "commit", "()Z", &[])
                        .map_err(|e| jni_err("editor.commit", e))?
                        .z()
                        .map_err(|e| jni_err("commit->z", e))?;
                    if !ok {
                        return Err(CamliError::Bridge(format!(
                            "SharedPreferences {} commit reported failure",
                            self.name
                        )));
                    }
                }
            }

            tracing::debug!(store = %self.name, edits = edits.len(), ?mode, "Android: preferences written");
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Obtain `context.getSharedPreferences(name, MODE_PRIVATE)`.
fn shared_preferences<'a>(
    env: &mut JNIEnv<'a>,
    context: &JObject<'_>,
    name: &str,
) -> Result<JObject<'a>> {
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err("new_string(prefs_name)", e))?;

    env.call_method(
        context,
        "getSharedPreferences",
        "(Ljava/lang/String;I)Landroid/content/SharedPreferences;",
        &[JValue::Object(&j_name), JValue::Int(MODE_PRIVATE)],
    )
    .map_err(|e| jni_err("getSharedPreferences", e))?
    .l()
    .map_err(|e| jni_err("getSharedPreferences->l", e))
}

/// Copy `prefs.getAll()` into Rust values.
///
/// Entries of types the uploader never writes are skipped.
fn load_entries(
    env: &mut JNIEnv<'_>,
    context: &JObject<'_>,
    name: &str,
) -> Result<BTreeMap<String, PrefValue>> {
    let prefs = shared_preferences(env, context, name)?;
    let all: JObject = env
        .call_method(&prefs, "getAll", "()Ljava/util/Map;", &[])
        .map_err(|e| jni_err("SharedPreferences.getAll", e))?
        .l()
        .map_err(|e| jni_err("getAll->l", e))?;
    let key_set: JObject = env
        .call_method(&all, "keySet", "()Ljava/util/Set;", &[])
        .map_err(|e| jni_err("Map.keySet", e))?
        .l()
        .map_err(|e| jni_err("keySet->l", e))?;

    let mut entries = BTreeMap::new();
    for key in string_collection(env, &key_set)? {
        let j_key: JString = env
            .new_string(&key)
            .map_err(|e| jni_err("new_string(key)", e))?;
        let value: JObject = env
            .call_method(
                &all,
                "get",
                "(Ljava/lang/Object;)Ljava/lang/Object;",
                &[JValue::Object(&j_key)],
            )
            .map_err(|e| jni_err("Map.get", e))?
            .l()
            .map_err(|e| jni_err("Map.get->l", e))?;
        match to_pref_value(env, value)? {
            Some(value) => {
                entries.insert(key, value);
            }
            None => tracing::debug!(store = name, key = %key, "Android: skipping entry of unsupported type"),
        }
    }
    Ok(entries)
}

/// Convert a boxed Java preference value.
///
/// Integer, long, and float entries are not part of the uploader's schema
/// and read as absent.
fn to_pref_value(env: &mut JNIEnv<'_>, value: JObject<'_>) -> Result<Option<PrefValue>> {
    if value.is_null() {
        return Ok(None);
    }

    if env
        .is_instance_of(&value, "java/lang/Boolean")
        .map_err(|e| jni_err("instanceof Boolean", e))?
    {
        let b = env
            .call_method(&value, "booleanValue", "()Z", &[])
            .map_err(|e| jni_err("Boolean.booleanValue", e))?
            .z()
            .map_err(|e| jni_err("booleanValue->z", e))?;
        return Ok(Some(PrefValue::Bool(b)));
    }

    if env
        .is_instance_of(&value, "java/lang/String")
        .map_err(|e| jni_err("instanceof String", e))?
    {
        let s: String = env
            .get_string(&JString::from(value))
            .map_err(|e| jni_err("get_string(value)", e))?
            .into();
        return Ok(Some(PrefValue::String(s)));
    }

    if env
        .is_instance_of(&value, "java/util/Set")
        .map_err(|e| jni_err("instanceof Set", e))?
    {
        let set: BTreeSet<String> = string_collection(env, &value)?.into_iter().collect();
        return Ok(Some(PrefValue::StringSet(set)));
    }

    Ok(None)
}

/// Copy a `java.util.Collection<String>` into Rust strings.
fn string_collection(env: &mut JNIEnv<'_>, collection: &JObject<'_>) -> Result<Vec<String>> {
    let array = JObjectArray::from(
        env.call_method(collection, "toArray", "()[Ljava/lang/Object;", &[])
            .map_err(|e| jni_err("Collection.toArray", e))?
            .l()
            .map_err(|e| jni_err("toArray->l", e))?,
    );
    let len = env
        .get_array_length(&array)
        .map_err(|e| jni_err("get_array_length", e))?;

    let mut out = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    for i in 0..len {
        let item = env
            .get_object_array_element(&array, i)
            .map_err(|e| jni_err("get_object_array_element", e))?;
        let s: String = env
            .get_string(&JString::from(item))
            .map_err(|e| jni_err("get_string(element)", e))?
            .into();
        out.push(s);
    }
    Ok(out)
}

/// `editor.putBoolean / putString / putStringSet(key, value)`.
fn put_value(
    env: &mut JNIEnv<'_>,
    editor: &JObject<'_>,
    key: &str,
    value: &PrefValue,
) -> Result<()> {
    let j_key: JString = env
        .new_string(key)
        .map_err(|e| jni_err("new_string(key)", e))?;

    match value {
        PrefValue::Bool(b) => {
            env.call_method(
                editor,
                "putBoolean",
                "(Ljava/lang/String;Z)Landroid/content/SharedPreferences$Editor;",
                &[JValue::Object(&j_key), JValue::Bool(u8::from(*b))],
            )
            .map_err(|e| jni_err("editor.putBoolean", e))?;
        }
        PrefValue::String(s) => {
            let j_value: JString = env
                .new_string(s)
                .map_err(|e| jni_err("new_string(value)", e))?;
            env.call_method(
                editor,
                "putString",
                "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/SharedPreferences$Editor;",
                &[JValue::Object(&j_key), JValue::Object(&j_value)],
            )
            .map_err(|e| jni_err("editor.putString", e))?;
        }
        PrefValue::StringSet(set) => {
            let j_set: JObject = env
                .new_object("java/util/HashSet", "()V", &[])
                .map_err(|e| jni_err("new HashSet", e))?;
            for item in set {
                let j_item: JString = env
                    .new_string(item)
                    .map_err(|e| jni_err("new_string(set item)", e))?;
                env.call_method(
                    &j_set,
                    "add",
                    "(Ljava/lang/Object;)Z",
                    &[JValue::Object(&j_item)],
                )
                .map_err(|e| jni_err("HashSet.add", e))?;
            }
            env.call_method(
                editor,
                "putStringSet",
                "(Ljava/lang/String;Ljava/util/Set;)Landroid/content/SharedPreferences$Editor;",
                &[JValue::Object(&j_key), JValue::Object(&j_set)],
            )
            .map_err(|e| jni_err("editor.putStringSet", e))?;
        }
    }
    Ok(())
}
