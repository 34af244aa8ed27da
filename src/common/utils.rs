//! 共通ユーティリティ関数群（URLエンコード/デコード、クエリ解析、ヘッダー検証 等）

use std::collections::HashMap;

use crate::error::Error;

/// URLエンコーディングのデコード関数
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (from_hex(bytes[i + 1]), from_hex(bytes[i + 2])) {
                result.push(h * 16 + l);
                i += 3;
                continue;
            }
        } else if bytes[i] == b'+' {
            result.push(b' ');
            i += 1;
            continue;
        }
        result.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&result).into_owned()
}

/// URLエンコーディングのエンコード関数（クエリ文字列構築用）
pub fn percent_encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push('%');
                result.push(to_hex(byte >> 4));
                result.push(to_hex(byte & 0x0F));
            }
        }
    }
    result
}

/// 16進数文字をバイト値に変換するヘルパー関数
fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// バイト下位4ビットを16進数文字に変換するヘルパー関数
fn to_hex(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'A' + nibble - 10) as char,
    }
}

/// クエリ文字列をパースしてURLデコードを行う共通関数
pub fn parse_query_string(query_string: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if query_string.is_empty() {
        return params;
    }

    for pair in query_string.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let Some(key) = parts.next() {
            let value = parts.next().unwrap_or("");
            let decoded_key = percent_decode(key);
            let decoded_value = percent_decode(value);
            params.insert(decoded_key, decoded_value);
        }
    }

    params
}

/// ヘッダー値に使用可能な文字かを判定（CRLF・制御文字を拒否）
pub fn is_header_value_valid(value: &str) -> bool {
    // RFC的にはobs-text等もありうるが、ここでは保守的にUS-ASCII可視範囲に限定し、
    // 制御文字(0x00-0x1F, 0x7F)およびCR/LFを拒否する
    if value.is_empty() {
        return true; // 空は許容（ヘッダー仕様上も可）
    }
    value.chars().all(|c| {
        let code = c as u32;
        code >= 0x20 && code != 0x7F && c != '\r' && c != '\n'
    })
}

/// ヘッダー名が安全なトークンかを簡易判定
pub fn is_header_name_valid(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    // token = 1*tchar, tchar = "!#$%&'*+-.^_`|~" or DIGIT or ALPHA
    name.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(c, '!'|'#'|'$'|'%'|'&'|'\''|'*'|'+'|'-'|'.'|'^'|'_'|'`'|'|'|'~')
    })
}

/// ヘルパー: 無効なヘッダー名/値ならErrorを返す
pub fn validate_header(name: &str, value: &str) -> Result<(), Error> {
    if !is_header_name_valid(name) {
        return Err(Error::InvalidHeader(format!(
            "header name '{}' contains invalid characters",
            name
        )));
    }
    if !is_header_value_valid(value) {
        return Err(Error::InvalidHeader(
            "header value contains control/CRLF or invalid chars".into(),
        ));
    }
    Ok(())
}
