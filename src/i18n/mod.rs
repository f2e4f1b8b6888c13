use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use once_cell::sync::OnceCell;
use std::sync::RwLock;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

// 嵌入 FTL 文件内容为静态常量
const EN_US_FTL: &str = include_str!("locales/en-US.ftl");
const ZH_CN_FTL: &str = include_str!("locales/zh-CN.ftl");

const FALLBACK_LOCALE: &str = "en-US";

// 支持的语言及其对应的 FTL 内容
const LOCALES: &[(&str, &str)] = &[
    ("en-US", EN_US_FTL),
    ("zh-CN", ZH_CN_FTL),
];

/// 全局 i18n 管理器
pub struct I18n {
    bundle: RwLock<FluentBundle<FluentResource>>,
    current_lang: RwLock<LanguageIdentifier>,
}

pub static I18N: OnceCell<I18n> = OnceCell::new();

/// 把任意输入（"zh_CN"、"zh-Hans-CN"、"en"）映射到内置的语言包
fn resolve_supported(locale: &str) -> &'static str {
    let normalized = locale.trim().replace('_', "-");
    if let Some((code, _)) = LOCALES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(&normalized))
    {
        return *code;
    }
    let primary = normalized
        .split('-')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    LOCALES
        .iter()
        .find(|(code, _)| code.to_ascii_lowercase().starts_with(&format!("{}-", primary)))
        .map(|(code, _)| *code)
        .unwrap_or(FALLBACK_LOCALE)
}

fn build_bundle(code: &'static str) -> (LanguageIdentifier, FluentBundle<FluentResource>) {
    let langid: LanguageIdentifier = code.parse().unwrap_or_default();
    let mut bundle = FluentBundle::new_concurrent(vec![langid.clone()]);
    // 终端输出不需要 Unicode 隔离符
    bundle.set_use_isolating(false);

    let source = LOCALES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, content)| *content)
        .unwrap_or(EN_US_FTL);

    let res = match FluentResource::try_new(source.to_string()) {
        Ok(res) => res,
        Err((res, errors)) => {
            warn!("I18n: FTL for {} parsed with errors: {:?}", code, errors);
            res
        }
    };
    if let Err(errors) = bundle.add_resource(res) {
        warn!("I18n: failed to add resource for {}: {:?}", code, errors);
    }
    (langid, bundle)
}

impl I18n {
    fn new(locale: &str) -> Self {
        let code = resolve_supported(locale);
        let (langid, bundle) = build_bundle(code);
        debug!("I18n init: requested = {}, resolved = {}", locale, code);
        I18n {
            bundle: RwLock::new(bundle),
            current_lang: RwLock::new(langid),
        }
    }

    /// 未显式初始化时按 en-US 懒加载
    fn global() -> &'static I18n {
        I18N.get_or_init(|| I18n::new(FALLBACK_LOCALE))
    }

    /// 初始化，加载默认语言；重复调用等同于切换语言
    pub fn init(default: &str) {
        if I18N.set(I18n::new(default)).is_err() {
            I18n::set_locale(default);
        }
    }

    /// 切换语言并重建 bundle
    pub fn set_locale(locale: &str) {
        debug!("I18n set_locale: switching to {}", locale);
        let i18n = I18n::global();
        let (langid, bundle) = build_bundle(resolve_supported(locale));
        *i18n
            .current_lang
            .write()
            .unwrap_or_else(|e| e.into_inner()) = langid;
        *i18n.bundle.write().unwrap_or_else(|e| e.into_inner()) = bundle;
    }

    pub fn current_locale() -> String {
        I18n::global()
            .current_lang
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .to_string()
    }

    /// 获取翻译字符串，缺失时返回 key 本身
    pub fn t(key: &str, args: Option<&FluentArgs>) -> String {
        let i18n = I18n::global();
        let bundle = i18n.bundle.read().unwrap_or_else(|e| e.into_inner());

        let m = bundle.get_message(key).and_then(|msg| msg.value());

        match m {
            Some(message) => {
                let mut errors = vec![];
                let value = bundle.format_pattern(message, args, &mut errors).to_string();
                if !errors.is_empty() {
                    debug!("I18n t(): key = {}, formatting errors = {:?}", key, errors);
                }
                value
            }
            None => {
                debug!("I18n: key '{}' not found", key);
                key.to_string()
            }
        }
    }
}

/// 带字符串参数的快捷翻译
pub fn tr(key: &str, args: &[(&str, &str)]) -> String {
    if args.is_empty() {
        return I18n::t(key, None);
    }
    let mut fluent_args = FluentArgs::new();
    for (k, v) in args {
        fluent_args.set(*k, v.to_string());
    }
    I18n::t(key, Some(&fluent_args))
}
