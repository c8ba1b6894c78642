/// Simple localization support for VesselUploader.
/// Locale can be selected via the `--locale` CLI flag (e.g. `--locale zh`).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" | "zh-hans" | "zh-tw" | "zh_tw" => Self::Zh,
            _ => Self::En,
        }
    }
}

pub struct Messages {
    pub title_idle: &'static str,
    pub title_uploading: &'static str,
    pub title_paused: &'static str,
    pub files_label: &'static str,
    pub remaining_label: &'static str,
    pub seconds_left: &'static str,
    pub all_uploaded: &'static str,
    pub slot_empty: &'static str,
    pub invalid_prefix: &'static str,
    pub warn_prefix: &'static str,
    pub info_prefix: &'static str,
    pub need_three: &'static str,
    pub nothing_to_start: &'static str,
    pub summary_header: &'static str,
}

pub static EN: Messages = Messages {
    title_idle: "Upload Images",
    title_uploading: "Uploading",
    title_paused: "Paused",
    files_label: "files",
    remaining_label: "files remaining",
    seconds_left: "seconds left",
    all_uploaded: "all uploads completed",
    slot_empty: "empty",
    invalid_prefix: "INVALID",
    warn_prefix: "WARN",
    info_prefix: "INFO",
    need_three: "three images are required before uploading",
    nothing_to_start: "nothing left to upload",
    summary_header: "Summary",
};

pub static ZH: Messages = Messages {
    title_idle: "上传图片",
    title_uploading: "正在上传",
    title_paused: "已暂停",
    files_label: "个文件",
    remaining_label: "个文件待完成",
    seconds_left: "秒剩余",
    all_uploaded: "全部上传完成",
    slot_empty: "空",
    invalid_prefix: "无效",
    warn_prefix: "警告",
    info_prefix: "信息",
    need_three: "上传前需要选择三张图片",
    nothing_to_start: "没有需要上传的文件",
    summary_header: "摘要",
};

pub fn get_messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::En => &EN,
        Locale::Zh => &ZH,
    }
}
