// 绿界(ECPay)交易签名工具函数
// 根据交易字段集合与共享密钥计算 CheckMacValue 完整性校验码

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// 网关约定的输出字段名，计算时必须从输入中排除
const CHECK_MAC_FIELD: &str = "CheckMacValue";

/// 表单编码保留字符集
///
/// 与 .NET HttpUtility.UrlEncode 一致: 字母数字与 `-_.!*()` 不转义,
/// 空格编码为 `+`，其余字节转义为 `%XX`。网关按该字符集验签。
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// 计算交易字段集合的 CheckMacValue
///
/// 算法（与网关端完全一致，顺序无关）:
/// 1. 排除名为 `CheckMacValue` 的字段
/// 2. 按键名字节序升序排序
/// 3. 渲染为 `key=value` 并以 `&` 连接
/// 4. 包装为 `HashKey=<hashKey>&<joined>&HashIV=<hashIV>`
/// 5. 表单编码后整体转小写（含 `%` 转义的十六进制位）
/// 6. 对 UTF-8 字节计算 SHA-256，输出大写十六进制
///
/// # Arguments
/// * `fields` - 交易字段集合 (键值对，插入顺序无关)
/// * `hash_key` - 网关共享密钥 HashKey
/// * `hash_iv` - 网关共享密钥 HashIV
///
/// # Returns
/// * 64位大写十六进制字符串
pub fn generate_check_mac_value(
    fields: &HashMap<String, String>,
    hash_key: &str,
    hash_iv: &str,
) -> String {
    let mut sorted: Vec<(&str, &str)> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != CHECK_MAC_FIELD)
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    // 字节序比较，非本地化、大小写敏感
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let raw = format!("HashKey={}&{}&HashIV={}", hash_key, joined, hash_iv);
    let encoded = form_urlencode_lowercase(&raw);

    let digest = Sha256::digest(encoded.as_bytes());
    hex::encode_upper(digest)
}

/// 表单编码并整体转小写
fn form_urlencode_lowercase(input: &str) -> String {
    utf8_percent_encode(input, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
        .to_lowercase()
}
