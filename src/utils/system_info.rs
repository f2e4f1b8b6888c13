#[cfg(windows)]
use windows::Win32::Globalization::{GetACP, GetLocaleInfoW, GetUserDefaultUILanguage, LOCALE_SNAME};

/// 返回当前系统活动代码页（ANSI Code Page）；非 Windows 视为 UTF-8 (65001)
#[cfg(windows)]
pub fn detect_system_encoding() -> u32 {
    unsafe { GetACP() }
}

#[cfg(not(windows))]
pub fn detect_system_encoding() -> u32 {
    65001
}

/// 返回系统 UI 语言的标准代码（如 "zh-CN"、"en-US"）
#[cfg(windows)]
pub fn get_system_language() -> String {
    unsafe {
        let lang_id = GetUserDefaultUILanguage();
        let mut buf = [0u16; 16];
        let len = GetLocaleInfoW(lang_id as u32, LOCALE_SNAME, Some(&mut buf));
        if len > 0 {
            String::from_utf16_lossy(&buf[..(len as usize - 1)])
        } else {
            "en-US".to_string()
        }
    }
}

#[cfg(not(windows))]
pub fn get_system_language() -> String {
    let raw = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_default();
    posix_locale_to_tag(&raw)
}

/// "zh_CN.UTF-8" -> "zh-CN"；"C" / "POSIX" / 空 -> "en-US"
pub fn posix_locale_to_tag(raw: &str) -> String {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX") {
        return "en-US".to_string();
    }
    base.replace('_', "-")
}

/// 返回 CPU 架构字符串，如 "x86"/"x64"/"ARM"/"ARM64"
pub fn get_cpu_architecture() -> String {
    match std::env::consts::ARCH {
        "x86" => "x86".into(),
        "x86_64" => "x64".into(),
        "arm" => "ARM".into(),
        "aarch64" => "ARM64".into(),
        _ => "Unknown".into(),
    }
}

/// 启动日志用的系统摘要
pub fn system_summary() -> String {
    let sys_name = sysinfo::System::name().unwrap_or_else(|| "未知系统".to_string());
    let kernel_version = sysinfo::System::kernel_version().unwrap_or_else(|| "未知内核版本".to_string());
    let os_version = sysinfo::System::long_os_version()
        .or_else(sysinfo::System::os_version)
        .unwrap_or_else(|| "未知OS版本".to_string());
    format!(
        "Encoding: {} | System: {} | Kernel: {} | OS Version: {} | CPU Architecture: {} | Language: {}",
        detect_system_encoding(),
        sys_name,
        kernel_version,
        os_version,
        get_cpu_architecture(),
        get_system_language()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix_locale_to_tag() {
        assert_eq!(posix_locale_to_tag("zh_CN.UTF-8"), "zh-CN");
        assert_eq!(posix_locale_to_tag("en_US@euro"), "en-US");
        assert_eq!(posix_locale_to_tag("C"), "en-US");
        assert_eq!(posix_locale_to_tag(""), "en-US");
    }

    #[test]
    fn test_cpu_architecture_known() {
        if cfg!(target_arch = "x86_64") {
            assert_eq!(get_cpu_architecture(), "x64");
        }
        assert!(system_summary().contains("CPU Architecture"));
    }
}
