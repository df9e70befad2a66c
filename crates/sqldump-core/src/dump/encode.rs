/// 列值的编码策略,按列的声明类型一次性确定,整表复用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodePolicy {
    Quote,       // 字符类型,单引号包裹并转义
    HexBinary,   // 二进制/几何类型,十六进制编码
    Passthrough, // 其余类型,统一按字符串加引号输出
}

/// NULL 字面量,覆盖所有编码策略
pub const NULL_LITERAL: &str = "NULL";

/// 根据列的声明类型确定编码策略
///
/// 未列出的类型(数值、日期时间等)走 Passthrough:值以文本形式加引号输出,
/// 任何可表示为文本的值都能得到自洽、可回放的字面量,代价是数值也带引号。
pub fn policy_for_type(kind: &str) -> EncodePolicy {
    match kind.to_ascii_uppercase().as_str() {
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT" | "GEOMETRY"
        | "POINT" | "LINESTRING" | "POLYGON" | "MULTIPOINT" | "MULTILINESTRING" | "MULTIPOLYGON"
        | "GEOMETRYCOLLECTION" => EncodePolicy::HexBinary,
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" | "JSON" => {
            EncodePolicy::Quote
        }
        _ => EncodePolicy::Passthrough,
    }
}

/// 将单列的可空原始值编码为一个 SQL 字面量
pub fn encode_value(
    policy: EncodePolicy,
    value: Option<&[u8]>,
) -> String {
    let bytes = match value {
        Some(bytes) => bytes,
        None => return NULL_LITERAL.into(),
    };

    match policy {
        EncodePolicy::HexBinary => hex_literal(bytes),
        EncodePolicy::Quote | EncodePolicy::Passthrough => {
            format!("'{}'", escape_string(&String::from_utf8_lossy(bytes)))
        }
    }
}

/// 转义字符串字面量内嵌的反斜杠与单引号
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

fn hex_literal(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    let mut literal = String::with_capacity(bytes.len() * 2 + 3);
    literal.push_str("x'");
    for byte in bytes {
        literal.push(HEX_CHARS[(byte >> 4) as usize] as char);
        literal.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    literal.push('\'');
    literal
}
