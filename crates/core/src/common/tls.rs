use tracing::debug;

/// # Summary
/// 安装进程级 rustls 加密后端 (ring)。
///
/// # Logic
/// 1. `reqwest` 以 `rustls-no-provider` 方式编译，构建客户端前必须存在默认 provider。
/// 2. 重复调用是安全的，已安装时仅记录调试日志。
pub fn ensure_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}
