/// 公共验证函数模块
/// 提供学生/课程标识符和选项键的输入验证，供测验和进度路由共用。
use crate::constants::MAX_ID_LENGTH;

/// 验证实体标识符：非空、不超过最大长度，只允许字母、数字、下划线和连字符
pub fn validate_entity_id(id: &str) -> Result<(), &'static str> {
    if id.is_empty() {
        return Err("标识符不能为空");
    }
    if id.len() > MAX_ID_LENGTH {
        return Err("标识符长度超出上限");
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err("标识符只能包含字母、数字、下划线和连字符");
    }
    Ok(())
}

/// 验证选项键：单个 ASCII 字母（A-Z，大小写不敏感）
pub fn validate_option_key(key: &str) -> Result<(), &'static str> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(()),
        _ => Err("选项键必须是单个字母"),
    }
}
