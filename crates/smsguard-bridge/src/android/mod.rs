// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android messaging platform via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each trait method calls into the ART runtime:
//
//   check_permission   Context.checkSelfPermission (API 23+, granted below)
//   send_transport     SmsManager.sendTextMessage / sendMultipartTextMessage
//   *_store            ContentResolver.query / insert / update / delete
//   notify_change      ContentResolver.notifyChange
//
// ## Architecture notes
//
// The host Context comes either from `ndk_context` (NativeActivity hosts) or
// is handed in explicitly by the `nativeHandle` JNI export, which is how the
// application shell's Kotlin side reaches the method channel.
//
// A Java exception thrown by any call is cleared before returning and its
// `toString()` is appended to the error, so callers see the real cause.

#![cfg(target_os = "android")]

use std::path::PathBuf;

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{jsize, jstring};
use jni::{JNIEnv, JavaVM};

use smsguard_core::BridgeConfig;
use smsguard_core::error::{Result, SmsError};
use smsguard_core::types::{
    Permission, Selection, SmsRecord, StoreRow, StoreUpdate, StoreUri, ThreadId, columns,
};

use crate::channel::{ChannelResponse, MethodChannel};
use crate::messaging::MessagingBridge;
use crate::traits::MessagingPlatform;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: i32 = 0;

/// `Build.VERSION_CODES.M` — runtime permissions start here.
const API_RUNTIME_PERMISSIONS: i32 = 23;

/// `Build.VERSION_CODES.S` — `SmsManager.getDefault()` deprecated.
const API_SMS_MANAGER_SERVICE: i32 = 31;

/// Bridge settings file, relative to `Context.getFilesDir()`.
const CONFIG_FILE: &str = "smsguard.json";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Convenience: map any `jni::errors::Error` into `SmsError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> SmsError {
    SmsError::Bridge(format!("{context}: {e}"))
}

/// Clear the pending Java exception and return its `toString()`.
fn take_exception(env: &mut JNIEnv<'_>) -> String {
    let throwable = env.exception_occurred();
    let _ = env.exception_clear();

    let Ok(throwable) = throwable else {
        return "unknown Java exception".into();
    };
    let described = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l());
    match described {
        Ok(obj) if !obj.is_null() => {
            let j_str = JString::from(obj);
            env.get_string(&j_str)
                .map(String::from)
                .unwrap_or_else(|_| "unknown Java exception".into())
        }
        _ => "unknown Java exception".into(),
    }
}

/// Attach the pending Java exception, if any, to `err` and clear it.
///
/// Must run before any further JNI call once a call has failed.
fn with_pending_cause(env: &mut JNIEnv<'_>, err: SmsError) -> SmsError {
    if !env.exception_check().unwrap_or(false) {
        return err;
    }
    let cause = take_exception(env);
    tracing::debug!(%cause, "Java exception raised during platform call");
    match err {
        SmsError::Bridge(detail) => SmsError::Bridge(format!("{detail} ({cause})")),
        other => other,
    }
}

/// Run `f`, then surface (and clear) any Java exception it left pending.
fn run_checked<T>(
    env: &mut JNIEnv<'_>,
    context: &JObject<'_>,
    f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>,
) -> Result<T> {
    match f(env, context) {
        Err(e) => Err(with_pending_cause(env, e)),
        Ok(value) if env.exception_check().unwrap_or(false) => {
            let cause = take_exception(env);
            drop(value);
            Err(SmsError::Bridge(format!("unexpected Java exception: {cause}")))
        }
        Ok(value) => Ok(value),
    }
}

/// `Build.VERSION.SDK_INT`.
fn sdk_int(env: &mut JNIEnv<'_>) -> Result<i32> {
    env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
        .i()
        .map_err(|e| jni_err("SDK_INT->i", e))
}

// ---------------------------------------------------------------------------
// Platform struct
// ---------------------------------------------------------------------------

enum Host {
    /// Resolve the VM and Context from `ndk_context` on every call.
    NdkContext,
    /// VM and Context handed in by a JNI caller.
    Explicit { vm: JavaVM, context: GlobalRef },
}

/// Android implementation of [`MessagingPlatform`].
///
/// Holds no Java state besides (optionally) a global reference to the host
/// Context; every call attaches to the VM, does its work, and lets its
/// local references go.
pub struct AndroidPlatform {
    host: Host,
}

impl AndroidPlatform {
    /// Platform backed by `ndk_context`.
    ///
    /// This does **not** touch JNI — the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self {
            host: Host::NdkContext,
        }
    }

    /// Platform backed by an explicit VM and Context.
    pub fn with_context(vm: JavaVM, context: GlobalRef) -> Self {
        Self {
            host: Host::Explicit { vm, context },
        }
    }

    /// Attach to the VM and run `f` with the host Context.
    fn with_env<T>(&self, f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
        match &self.host {
            Host::NdkContext => {
                let ctx = ndk_context::android_context();
                // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
                // The pointer is guaranteed valid for the lifetime of the process.
                let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
                    .map_err(|e| SmsError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
                let ptr = ctx.context();
                if ptr.is_null() {
                    return Err(SmsError::Bridge(
                        "Android context is null — native activity not initialised".into(),
                    ));
                }
                // SAFETY: the NDK guarantees this pointer is a valid global jobject
                // for the hosting Context.
                let context = unsafe { JObject::from_raw(ptr.cast()) };
                let mut env = vm
                    .attach_current_thread()
                    .map_err(|e| SmsError::Bridge(format!("failed to attach JNI thread: {e}")))?;
                run_checked(&mut env, &context, f)
            }
            Host::Explicit { vm, context } => {
                let mut env = vm
                    .attach_current_thread()
                    .map_err(|e| SmsError::Bridge(format!("failed to attach JNI thread: {e}")))?;
                run_checked(&mut env, context.as_obj(), f)
            }
        }
    }
}

impl Default for AndroidPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagingPlatform for AndroidPlatform {
    fn platform_name(&self) -> &str {
        "Android"
    }

    /// `checkSelfPermission` on API 23+; install-time grants before that.
    fn check_permission(&self, permission: Permission) -> Result<bool> {
        self.with_env(|env, context| {
            if sdk_int(env)? < API_RUNTIME_PERMISSIONS {
                return Ok(true);
            }
            let j_perm: JString = env
                .new_string(permission.manifest_name())
                .map_err(|e| jni_err("new_string(permission)", e))?;
            let status = env
                .call_method(
                    context,
                    "checkSelfPermission",
                    "(Ljava/lang/String;)I",
                    &[JValue::Object(&j_perm)],
                )
                .map_err(|e| jni_err("checkSelfPermission", e))?
                .i()
                .map_err(|e| jni_err("checkSelfPermission->i", e))?;
            tracing::debug!(%permission, status, "Android: permission checked");
            Ok(status == PERMISSION_GRANTED)
        })
    }

    fn query_store(&self, uri: &StoreUri, selection: &Selection) -> Result<Vec<StoreRow>> {
        self.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let j_uri = parse_uri(env, uri)?;
            let projection = string_array(env, &[columns::THREAD_ID, columns::READ])?;
            let (clause, args) = selection.to_sql();
            let j_clause = optional_string(env, clause.as_deref())?;
            let j_args = optional_string_array(env, &args)?;

            // resolver.query(uri, projection, selection, selectionArgs, null)
            let cursor: JObject = env
                .call_method(
                    &resolver,
                    "query",
                    "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
                    &[
                        JValue::Object(&j_uri),
                        JValue::Object(&projection),
                        JValue::Object(&j_clause),
                        JValue::Object(&j_args),
                        JValue::Object(&JObject::null()),
                    ],
                )
                .map_err(|e| jni_err("ContentResolver.query", e))?
                .l()
                .map_err(|e| jni_err("query->l", e))?;

            if cursor.is_null() {
                return Err(SmsError::OperationFault(format!(
                    "ContentResolver returned no cursor for {uri}"
                )));
            }

            let rows = read_rows(env, &cursor).map_err(|e| with_pending_cause(env, e));
            // Close even when reading failed; a close failure only matters
            // if reading succeeded.
            let closed = env
                .call_method(&cursor, "close", "()V", &[])
                .map_err(|e| jni_err("Cursor.close", e));
            let rows = rows?;
            closed?;

            tracing::debug!(%uri, rows = rows.len(), "Android: store queried");
            Ok(rows)
        })
    }

    fn insert_store(&self, uri: &StoreUri, record: &SmsRecord) -> Result<()> {
        self.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let j_uri = parse_uri(env, uri)?;

            let values = new_content_values(env)?;
            put_string(env, &values, columns::ADDRESS, &record.address)?;
            put_string(env, &values, columns::BODY, &record.body)?;
            put_long(env, &values, columns::DATE, record.date_millis)?;
            put_int(env, &values, columns::READ, i32::from(record.read))?;
            put_int(env, &values, columns::TYPE, record.kind.as_column_value())?;

            // resolver.insert(uri, values)
            let inserted: JObject = env
                .call_method(
                    &resolver,
                    "insert",
                    "(Landroid/net/Uri;Landroid/content/ContentValues;)Landroid/net/Uri;",
                    &[JValue::Object(&j_uri), JValue::Object(&values)],
                )
                .map_err(|e| jni_err("ContentResolver.insert", e))?
                .l()
                .map_err(|e| jni_err("insert->l", e))?;

            if inserted.is_null() {
                return Err(SmsError::OperationFault(format!(
                    "ContentResolver rejected insert into {uri}"
                )));
            }
            tracing::info!(%uri, "Android: message saved to store");
            Ok(())
        })
    }

    fn update_store(
        &self,
        uri: &StoreUri,
        selection: &Selection,
        update: &StoreUpdate,
    ) -> Result<usize> {
        let Some(read) = update.read else {
            return Ok(0);
        };

        self.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let j_uri = parse_uri(env, uri)?;

            let values = new_content_values(env)?;
            put_int(env, &values, columns::READ, i32::from(read))?;

            let (clause, args) = selection.to_sql();
            let j_clause = optional_string(env, clause.as_deref())?;
            let j_args = optional_string_array(env, &args)?;

            // resolver.update(uri, values, selection, selectionArgs)
            let updated = env
                .call_method(
                    &resolver,
                    "update",
                    "(Landroid/net/Uri;Landroid/content/ContentValues;Ljava/lang/String;[Ljava/lang/String;)I",
                    &[
                        JValue::Object(&j_uri),
                        JValue::Object(&values),
                        JValue::Object(&j_clause),
                        JValue::Object(&j_args),
                    ],
                )
                .map_err(|e| jni_err("ContentResolver.update", e))?
                .i()
                .map_err(|e| jni_err("update->i", e))?;

            tracing::debug!(%uri, updated, "Android: store updated");
            Ok(usize::try_from(updated).unwrap_or(0))
        })
    }

    fn delete_store(&self, uri: &StoreUri, selection: &Selection) -> Result<usize> {
        self.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let j_uri = parse_uri(env, uri)?;

            let (clause, args) = selection.to_sql();
            let j_clause = optional_string(env, clause.as_deref())?;
            let j_args = optional_string_array(env, &args)?;

            // resolver.delete(uri, selection, selectionArgs)
            let deleted = env
                .call_method(
                    &resolver,
                    "delete",
                    "(Landroid/net/Uri;Ljava/lang/String;[Ljava/lang/String;)I",
                    &[
                        JValue::Object(&j_uri),
                        JValue::Object(&j_clause),
                        JValue::Object(&j_args),
                    ],
                )
                .map_err(|e| jni_err("ContentResolver.delete", e))?
                .i()
                .map_err(|e| jni_err("delete->i", e))?;

            tracing::debug!(%uri, deleted, "Android: store rows deleted");
            Ok(usize::try_from(deleted).unwrap_or(0))
        })
    }

    fn notify_change(&self, uri: &StoreUri) -> Result<()> {
        self.with_env(|env, context| {
            let resolver = content_resolver(env, context)?;
            let j_uri = parse_uri(env, uri)?;

            // resolver.notifyChange(uri, null)
            env.call_method(
                &resolver,
                "notifyChange",
                "(Landroid/net/Uri;Landroid/database/ContentObserver;)V",
                &[JValue::Object(&j_uri), JValue::Object(&JObject::null())],
            )
            .map_err(|e| jni_err("ContentResolver.notifyChange", e))?;
            Ok(())
        })
    }

    /// Fire-and-forget: no sent/delivery PendingIntents are registered.
    fn send_transport(&self, destination: &str, segments: &[String]) -> Result<()> {
        self.with_env(|env, context| {
            let manager = sms_manager(env, context)?;
            let j_dest: JString = env
                .new_string(destination)
                .map_err(|e| jni_err("new_string(destination)", e))?;
            let null = JObject::null();

            if let [body] = segments {
                let j_body: JString = env
                    .new_string(body)
                    .map_err(|e| jni_err("new_string(body)", e))?;

                // manager.sendTextMessage(dest, null, body, null, null)
                env.call_method(
                    &manager,
                    "sendTextMessage",
                    "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;Landroid/app/PendingIntent;Landroid/app/PendingIntent;)V",
                    &[
                        JValue::Object(&j_dest),
                        JValue::Object(&null),
                        JValue::Object(&j_body),
                        JValue::Object(&null),
                        JValue::Object(&null),
                    ],
                )
                .map_err(|e| jni_err("SmsManager.sendTextMessage", e))?;
            } else {
                let parts = array_list(env, segments)?;

                // manager.sendMultipartTextMessage(dest, null, parts, null, null)
                env.call_method(
                    &manager,
                    "sendMultipartTextMessage",
                    "(Ljava/lang/String;Ljava/lang/String;Ljava/util/ArrayList;Ljava/util/ArrayList;Ljava/util/ArrayList;)V",
                    &[
                        JValue::Object(&j_dest),
                        JValue::Object(&null),
                        JValue::Object(&parts),
                        JValue::Object(&null),
                        JValue::Object(&null),
                    ],
                )
                .map_err(|e| jni_err("SmsManager.sendMultipartTextMessage", e))?;
            }

            tracing::info!(parts = segments.len(), "Android: SMS handed to SmsManager");
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// JNI entry point
// ---------------------------------------------------------------------------

/// `SmsBridge.nativeHandle(context: Context, request: String): String`.
///
/// Serves one method channel request. A fresh platform and bridge are built
/// per call; settings come from `<filesDir>/smsguard.json` when present.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_dovahkin_sms_1guard_SmsBridge_nativeHandle<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    context: JObject<'local>,
    request: JString<'local>,
) -> jstring {
    crate::init_logging();

    let reply = match handle_native(&mut env, &context, &request) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "Android: channel request could not be served");
            serde_json::to_string(&ChannelResponse::from(e)).unwrap_or_default()
        }
    };

    match env.new_string(reply) {
        Ok(j_reply) => j_reply.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "Android: failed to build reply string");
            std::ptr::null_mut()
        }
    }
}

fn handle_native(
    env: &mut JNIEnv<'_>,
    context: &JObject<'_>,
    request: &JString<'_>,
) -> Result<String> {
    let request: String = env
        .get_string(request)
        .map_err(|e| jni_err("get_string(request)", e))?
        .into();

    let config = match files_dir(env, context) {
        Ok(dir) => BridgeConfig::load_or_default(dir.join(CONFIG_FILE)),
        Err(e) => {
            tracing::warn!(error = %e, "Android: files dir unavailable, using default config");
            BridgeConfig::default()
        }
    };

    let vm = env
        .get_java_vm()
        .map_err(|e| jni_err("get_java_vm", e))?;
    let global = env
        .new_global_ref(context)
        .map_err(|e| jni_err("new_global_ref(context)", e))?;

    let platform = AndroidPlatform::with_context(vm, global);
    let channel = MethodChannel::new(MessagingBridge::with_config(platform, config));
    Ok(channel.handle(&request))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `context.getContentResolver()`.
fn content_resolver<'a>(env: &mut JNIEnv<'a>, context: &JObject<'_>) -> Result<JObject<'a>> {
    env.call_method(
        context,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )
    .map_err(|e| jni_err("getContentResolver", e))?
    .l()
    .map_err(|e| jni_err("getContentResolver->l", e))
}

/// `Uri.parse(uri)`.
fn parse_uri<'a>(env: &mut JNIEnv<'a>, uri: &StoreUri) -> Result<JObject<'a>> {
    let j_uri_str: JString = env
        .new_string(uri.as_content_uri())
        .map_err(|e| jni_err("new_string(uri)", e))?;

    env.call_static_method(
        "android/net/Uri",
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&j_uri_str)],
    )
    .map_err(|e| jni_err("Uri.parse", e))?
    .l()
    .map_err(|e| jni_err("Uri.parse->l", e))
}

/// Obtain the `SmsManager`: the system service on API 31+, `getDefault()` before.
fn sms_manager<'a>(env: &mut JNIEnv<'a>, context: &JObject<'_>) -> Result<JObject<'a>> {
    let manager: JObject = if sdk_int(env)? >= API_SMS_MANAGER_SERVICE {
        let class = env
            .find_class("android/telephony/SmsManager")
            .map_err(|e| jni_err("find_class(SmsManager)", e))?;
        env.call_method(
            context,
            "getSystemService",
            "(Ljava/lang/Class;)Ljava/lang/Object;",
            &[JValue::Object(&class)],
        )
        .map_err(|e| jni_err("getSystemService(SmsManager)", e))?
        .l()
        .map_err(|e| jni_err("getSystemService->l", e))?
    } else {
        env.call_static_method(
            "android/telephony/SmsManager",
            "getDefault",
            "()Landroid/telephony/SmsManager;",
            &[],
        )
        .map_err(|e| jni_err("SmsManager.getDefault", e))?
        .l()
        .map_err(|e| jni_err("getDefault->l", e))?
    };

    if manager.is_null() {
        return Err(SmsError::Transmission(
            "SmsManager is not available on this device".into(),
        ));
    }
    Ok(manager)
}

/// `context.getFilesDir().getAbsolutePath()`.
fn files_dir(env: &mut JNIEnv<'_>, context: &JObject<'_>) -> Result<PathBuf> {
    let dir: JObject = env
        .call_method(context, "getFilesDir", "()Ljava/io/File;", &[])
        .map_err(|e| jni_err("getFilesDir", e))?
        .l()
        .map_err(|e| jni_err("getFilesDir->l", e))?;

    let j_path: JObject = env
        .call_method(&dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err("getAbsolutePath", e))?
        .l()
        .map_err(|e| jni_err("getAbsolutePath->l", e))?;

    let path: String = env
        .get_string(&JString::from(j_path))
        .map_err(|e| jni_err("get_string(filesDir)", e))?
        .into();
    Ok(PathBuf::from(path))
}

/// Build a `String[]`.
fn string_array<'a>(env: &mut JNIEnv<'a>, items: &[impl AsRef<str>]) -> Result<JObject<'a>> {
    let string_class = env
        .find_class("java/lang/String")
        .map_err(|e| jni_err("find_class(String)", e))?;

    let array = env
        .new_object_array(items.len() as jsize, &string_class, &JObject::null())
        .map_err(|e| jni_err("new_object_array", e))?;

    for (i, item) in items.iter().enumerate() {
        let j_item: JString = env
            .new_string(item.as_ref())
            .map_err(|e| jni_err("new_string(array item)", e))?;
        env.set_object_array_element(&array, i as jsize, &j_item)
            .map_err(|e| jni_err("set_object_array_element", e))?;
        env.delete_local_ref(j_item)
            .map_err(|e| jni_err("delete_local_ref(array item)", e))?;
    }
    Ok(JObject::from(array))
}

/// `String[]`, or `null` when there are no items.
fn optional_string_array<'a>(env: &mut JNIEnv<'a>, items: &[String]) -> Result<JObject<'a>> {
    if items.is_empty() {
        Ok(JObject::null())
    } else {
        string_array(env, items)
    }
}

/// `String`, or `null`.
fn optional_string<'a>(env: &mut JNIEnv<'a>, value: Option<&str>) -> Result<JObject<'a>> {
    match value {
        Some(s) => env
            .new_string(s)
            .map(JObject::from)
            .map_err(|e| jni_err("new_string", e)),
        None => Ok(JObject::null()),
    }
}

/// Build a `java.util.ArrayList<String>` of message parts.
fn array_list<'a>(env: &mut JNIEnv<'a>, items: &[String]) -> Result<JObject<'a>> {
    let list = env
        .new_object("java/util/ArrayList", "(I)V", &[JValue::Int(items.len() as i32)])
        .map_err(|e| jni_err("new ArrayList", e))?;

    for item in items {
        let j_item: JString = env
            .new_string(item)
            .map_err(|e| jni_err("new_string(part)", e))?;
        env.call_method(&list, "add", "(Ljava/lang/Object;)Z", &[JValue::Object(&j_item)])
            .map_err(|e| jni_err("ArrayList.add", e))?;
        env.delete_local_ref(j_item)
            .map_err(|e| jni_err("delete_local_ref(part)", e))?;
    }
    Ok(list)
}

fn new_content_values<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>> {
    env.new_object("android/content/ContentValues", "()V", &[])
        .map_err(|e| jni_err("new ContentValues", e))
}

/// `values.put(key, String)`.
fn put_string(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: &str) -> Result<()> {
    let j_key: JString = env.new_string(key).map_err(|e| jni_err("new_string(key)", e))?;
    let j_value: JString = env
        .new_string(value)
        .map_err(|e| jni_err("new_string(value)", e))?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/String;)V",
        &[JValue::Object(&j_key), JValue::Object(&j_value)],
    )
    .map_err(|e| jni_err("ContentValues.put(String)", e))?;
    Ok(())
}

/// `values.put(key, Long.valueOf(value))`.
fn put_long(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: i64) -> Result<()> {
    let j_key: JString = env.new_string(key).map_err(|e| jni_err("new_string(key)", e))?;
    let boxed = env
        .call_static_method("java/lang/Long", "valueOf", "(J)Ljava/lang/Long;", &[JValue::Long(value)])
        .map_err(|e| jni_err("Long.valueOf", e))?
        .l()
        .map_err(|e| jni_err("Long.valueOf->l", e))?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/Long;)V",
        &[JValue::Object(&j_key), JValue::Object(&boxed)],
    )
    .map_err(|e| jni_err("ContentValues.put(Long)", e))?;
    Ok(())
}

/// `values.put(key, Integer.valueOf(value))`.
fn put_int(env: &mut JNIEnv<'_>, values: &JObject<'_>, key: &str, value: i32) -> Result<()> {
    let j_key: JString = env.new_string(key).map_err(|e| jni_err("new_string(key)", e))?;
    let boxed = env
        .call_static_method(
            "java/lang/Integer",
            "valueOf",
            "(I)Ljava/lang/Integer;",
            &[JValue::Int(value)],
        )
        .map_err(|e| jni_err("Integer.valueOf", e))?
        .l()
        .map_err(|e| jni_err("Integer.valueOf->l", e))?;
    env.call_method(
        values,
        "put",
        "(Ljava/lang/String;Ljava/lang/Integer;)V",
        &[JValue::Object(&j_key), JValue::Object(&boxed)],
    )
    .map_err(|e| jni_err("ContentValues.put(Integer)", e))?;
    Ok(())
}

/// Read `(thread_id, read)` from every remaining cursor row.
///
/// Rows with a null thread id are skipped. Per-row local references are
/// released as we go so large inboxes do not exhaust the local table.
fn read_rows(env: &mut JNIEnv<'_>, cursor: &JObject<'_>) -> Result<Vec<StoreRow>> {
    let thread_col = column_index(env, cursor, columns::THREAD_ID)?;
    let read_col = column_index(env, cursor, columns::READ)?;

    let mut rows = Vec::new();
    loop {
        let has_next = env
            .call_method(cursor, "moveToNext", "()Z", &[])
            .map_err(|e| jni_err("Cursor.moveToNext", e))?
            .z()
            .map_err(|e| jni_err("moveToNext->z", e))?;
        if !has_next {
            break;
        }

        let j_thread: JObject = env
            .call_method(cursor, "getString", "(I)Ljava/lang/String;", &[JValue::Int(thread_col)])
            .map_err(|e| jni_err("Cursor.getString(thread_id)", e))?
            .l()
            .map_err(|e| jni_err("getString->l", e))?;
        if j_thread.is_null() {
            continue;
        }
        let j_thread = JString::from(j_thread);
        let thread_id: String = env
            .get_string(&j_thread)
            .map_err(|e| jni_err("get_string(thread_id)", e))?
            .into();
        env.delete_local_ref(j_thread)
            .map_err(|e| jni_err("delete_local_ref(thread_id)", e))?;

        let read = env
            .call_method(cursor, "getInt", "(I)I", &[JValue::Int(read_col)])
            .map_err(|e| jni_err("Cursor.getInt(read)", e))?
            .i()
            .map_err(|e| jni_err("getInt->i", e))?;

        rows.push(StoreRow {
            thread_id: ThreadId(thread_id),
            read: read != 0,
        });
    }
    Ok(rows)
}

/// `cursor.getColumnIndexOrThrow(name)`.
fn column_index(env: &mut JNIEnv<'_>, cursor: &JObject<'_>, name: &str) -> Result<i32> {
    let j_name: JString = env
        .new_string(name)
        .map_err(|e| jni_err("new_string(column)", e))?;
    env.call_method(
        cursor,
        "getColumnIndexOrThrow",
        "(Ljava/lang/String;)I",
        &[JValue::Object(&j_name)],
    )
    .map_err(|e| jni_err("Cursor.getColumnIndexOrThrow", e))?
    .i()
    .map_err(|e| jni_err("getColumnIndexOrThrow->i", e))
}
