// src/core/minecraft/rpc.rs
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

use super::backend::{ContentBackend, ContentRoots, FileEntry};
use crate::result::CoreError;

/// 后端绑定的命名空间
const NAMESPACE: &str = "minecraft";

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    name: String,
    args: &'a [Value],
}

#[derive(Debug, Default, Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

/// 解析一次调用的返回；`result` 为 null 时取类型默认值
fn parse_reply<T: DeserializeOwned + Default>(method: &str, reply: RpcReply) -> Result<T, CoreError> {
    if let Some(message) = reply.error.filter(|m| !m.is_empty()) {
        return Err(CoreError::Backend {
            method: method.to_string(),
            message,
        });
    }
    if reply.result.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(reply.result)?)
}

/// Go 后端的 []byte 在 JSON 里是 base64 字符串
fn bytes_arg(data: &[u8]) -> Value {
    Value::String(STANDARD.encode(data))
}

fn path_arg(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

/// 通过 HTTP 调用启动器后端
#[derive(Debug, Clone)]
pub struct RpcBackend {
    client: Client,
    call_url: Url,
}

impl RpcBackend {
    /// 只设置连接超时；导入调用可能很慢，请求本身不设超时
    pub fn new(endpoint: &str, connect_timeout: Duration) -> Result<Self, CoreError> {
        let call_url = Self::call_url(endpoint)?;
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(2)
            .build()?;
        debug!("RPC backend: {}", call_url);
        Ok(Self { client, call_url })
    }

    fn call_url(endpoint: &str) -> Result<Url, CoreError> {
        let mut base = endpoint.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "backend endpoint must be http or https: {}",
                endpoint.trim()
            )));
        }
        Ok(url.join("call")?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.call_url
    }

    async fn call<T: DeserializeOwned + Default>(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<T, CoreError> {
        let request = RpcRequest {
            name: format!("{}.{}", NAMESPACE, method),
            args,
        };
        trace!("rpc -> {}", request.name);

        let reply: RpcReply = self
            .client
            .post(self.call_url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_reply(method, reply)
    }
}

#[async_trait]
impl ContentBackend for RpcBackend {
    async fn import_mcpack_bytes(
        &self,
        version: &str,
        player: Option<&str>,
        file_name: &str,
        data: &[u8],
        overwrite: bool,
    ) -> Result<String, CoreError> {
        match player {
            Some(p) => {
                self.call(
                    "ImportMcpackWithPlayer",
                    &[json!(version), json!(p), json!(file_name), bytes_arg(data), json!(overwrite)],
                )
                .await
            }
            None => {
                self.call("ImportMcpack", &[json!(version), bytes_arg(data), json!(overwrite)])
                    .await
            }
        }
    }

    async fn import_mcpack_path(
        &self,
        version: &str,
        player: Option<&str>,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        match player {
            Some(p) => {
                self.call(
                    "ImportMcpackPathWithPlayer",
                    &[json!(version), json!(p), path_arg(path), json!(overwrite)],
                )
                .await
            }
            None => {
                self.call("ImportMcpackPath", &[json!(version), path_arg(path), json!(overwrite)])
                    .await
            }
        }
    }

    async fn import_mcaddon_bytes(
        &self,
        version: &str,
        player: Option<&str>,
        data: &[u8],
        overwrite: bool,
    ) -> Result<String, CoreError> {
        match player {
            Some(p) => {
                self.call(
                    "ImportMcaddonWithPlayer",
                    &[json!(version), json!(p), bytes_arg(data), json!(overwrite)],
                )
                .await
            }
            None => {
                self.call("ImportMcaddon", &[json!(version), bytes_arg(data), json!(overwrite)])
                    .await
            }
        }
    }

    async fn import_mcaddon_path(
        &self,
        version: &str,
        player: Option<&str>,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        match player {
            Some(p) => {
                self.call(
                    "ImportMcaddonPathWithPlayer",
                    &[json!(version), json!(p), path_arg(path), json!(overwrite)],
                )
                .await
            }
            None => {
                self.call("ImportMcaddonPath", &[json!(version), path_arg(path), json!(overwrite)])
                    .await
            }
        }
    }

    async fn import_mcworld_path(
        &self,
        version: &str,
        player: &str,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.call(
            "ImportMcworldPath",
            &[json!(version), json!(player), path_arg(path), json!(overwrite)],
        )
        .await
    }

    async fn is_mcpack_skin_pack(&self, data: &[u8]) -> Result<bool, CoreError> {
        self.call("IsMcpackSkinPack", &[bytes_arg(data)]).await
    }

    async fn is_mcpack_skin_pack_path(&self, path: &Path) -> Result<bool, CoreError> {
        self.call("IsMcpackSkinPackPath", &[path_arg(path)]).await
    }

    async fn write_temp_file(&self, name: &str, data: &[u8]) -> Result<PathBuf, CoreError> {
        let path: String = self
            .call("WriteTempFile", &[json!(name), bytes_arg(data)])
            .await?;
        if path.is_empty() {
            return Err(CoreError::Backend {
                method: "WriteTempFile".into(),
                message: "empty path".into(),
            });
        }
        Ok(PathBuf::from(path))
    }

    async fn remove_temp_file(&self, path: &Path) -> Result<(), CoreError> {
        let _: Value = self.call("RemoveTempFile", &[path_arg(path)]).await?;
        Ok(())
    }

    async fn get_content_roots(&self, version: &str) -> Result<ContentRoots, CoreError> {
        self.call("GetContentRoots", &[json!(version)]).await
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, CoreError> {
        self.call("ListDir", &[json!(path)]).await
    }

    async fn is_game_input_installed(&self) -> Result<bool, CoreError> {
        self.call("IsGameInputInstalled", &[]).await
    }

    async fn is_gaming_services_installed(&self) -> Result<bool, CoreError> {
        self.call("IsGamingServicesInstalled", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_url_joins_endpoint() {
        let url = RpcBackend::call_url("http://127.0.0.1:34115").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:34115/call");
        let nested = RpcBackend::call_url("http://localhost:8080/rpc/").unwrap();
        assert_eq!(nested.as_str(), "http://localhost:8080/rpc/call");
        assert!(RpcBackend::call_url("not a url").is_err());
        match RpcBackend::call_url("ftp://127.0.0.1:21") {
            Err(CoreError::Config(msg)) => assert!(msg.contains("ftp://")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_request_shape() {
        let args = [json!("1.21.50"), bytes_arg(b"PK"), json!(false)];
        let req = RpcRequest {
            name: format!("{}.{}", NAMESPACE, "ImportMcpack"),
            args: &args,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["name"], "minecraft.ImportMcpack");
        assert_eq!(v["args"][1], "UEs=");
        assert_eq!(v["args"][2], false);
    }

    #[test]
    fn test_reply_error_is_backend_error() {
        let reply: RpcReply = serde_json::from_str(r#"{"error":"method not found"}"#).unwrap();
        match parse_reply::<String>("ImportMcworldPath", reply) {
            Err(CoreError::Backend { method, message }) => {
                assert_eq!(method, "ImportMcworldPath");
                assert_eq!(message, "method not found");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_reply_values() {
        let code: String =
            parse_reply("ImportMcpack", serde_json::from_str(r#"{"result":"ERR_OPEN_ZIP"}"#).unwrap()).unwrap();
        assert_eq!(code, "ERR_OPEN_ZIP");

        // null 结果视为成功（空错误码）
        let empty: String = parse_reply("ImportMcpack", serde_json::from_str(r#"{"result":null}"#).unwrap()).unwrap();
        assert!(empty.is_empty());

        let entries: Vec<FileEntry> = parse_reply(
            "ListDir",
            serde_json::from_str(r#"{"result":[{"name":"Steve","path":"U/Steve","isDir":true,"size":0}]}"#).unwrap(),
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_dir);
    }
}
