use chrono::{DateTime, Datelike, TimeZone, Timelike};
use regex::Regex;
use std::sync::LazyLock;

/// 按 `YYYY MM DD HH mm ss` 占位符格式化日期
pub fn format_date<Tz: TimeZone>(d: &DateTime<Tz>, pattern: &str) -> String {
    pattern
        .replace("YYYY", &d.year().to_string())
        .replace("MM", &format!("{:02}", d.month()))
        .replace("DD", &format!("{:02}", d.day()))
        .replace("HH", &format!("{:02}", d.hour()))
        .replace("mm", &format!("{:02}", d.minute()))
        .replace("ss", &format!("{:02}", d.second()))
}

/// 相对时间；超过 7 天显示日期，未来时间视为刚刚
pub fn format_relative_time<Tz: TimeZone>(d: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    let diff = now.clone().signed_duration_since(d.clone());
    let days = diff.num_days();
    let hours = diff.num_hours();
    let minutes = diff.num_minutes();

    if days > 7 {
        format_date(d, "YYYY-MM-DD")
    } else if days > 0 {
        format!("{days} 天前")
    } else if hours > 0 {
        format!("{hours} 小时前")
    } else if minutes > 0 {
        format!("{minutes} 分钟前")
    } else {
        "刚刚".to_string()
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", trim_decimals(value), UNITS[unit])
}

/// 最多两位小数，去掉末尾的 0
fn trim_decimals(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// 千分位分隔
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 人民币金额，保留两位小数
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!(
        "{sign}¥{}.{:02}",
        format_number((abs / 100) as i64),
        abs % 100
    )
}

pub struct PasswordRule {
    pub label: &'static str,
    test: fn(&str) -> bool,
}

impl PasswordRule {
    pub fn test(&self, password: &str) -> bool {
        (self.test)(password)
    }
}

static UPPER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());
static SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).unwrap());

pub static PASSWORD_RULES: [PasswordRule; 5] = [
    PasswordRule {
        label: "至少 8 个字符",
        test: |p| p.chars().count() >= 8,
    },
    PasswordRule {
        label: "包含大写字母",
        test: |p| UPPER_RE.is_match(p),
    },
    PasswordRule {
        label: "包含小写字母",
        test: |p| LOWER_RE.is_match(p),
    },
    PasswordRule {
        label: "包含数字",
        test: |p| DIGIT_RE.is_match(p),
    },
    PasswordRule {
        label: "包含特殊字符",
        test: |p| SPECIAL_RE.is_match(p),
    },
];

/// 0 为空密码，1..=4 依次增强
pub fn password_strength(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    let passed = PASSWORD_RULES.iter().filter(|r| r.test(password)).count();
    match passed {
        0 | 1 => 1,
        2 => 2,
        3 | 4 => 3,
        _ => 4,
    }
}

pub fn password_strength_label(strength: u8) -> &'static str {
    match strength {
        0 => "无",
        1 => "弱",
        2 => "中",
        3 => "强",
        _ => "很强",
    }
}

pub fn password_strength_color(strength: u8) -> &'static str {
    match strength {
        0 => "gray",
        1 => "red",
        2 => "orange",
        3 => "yellow",
        _ => "green",
    }
}
