use std::path::{Path, PathBuf};

use crate::domain::entities::{Answer, QuestionEntry, Response};

pub const IMAGE_FAILURE: &str = "图片资源加载失败，请联系管理员。";
pub const EMPTY_QUESTION_HINT: &str = "请输入问题关键词，例如：/提问 学校简介";
const FALLBACK_HEADER: &str = "未找到相关回答，请尝试其他关键词，或咨询其他学长。";
const FALLBACK_SUGGEST: &str = "可以尝试以下关键词：";

/// Turns lookup results into chat responses
#[derive(Debug, Clone)]
pub struct Responder {
    image_dir: PathBuf,
    contact: Option<String>,
}

impl Responder {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            contact: None,
        }
    }

    /// Line placed between the no-match notice and the suggestions
    pub fn with_contact(mut self, contact: Option<String>) -> Self {
        self.contact = contact.filter(|c| !c.trim().is_empty());
        self
    }

    /// Relative image paths live under the image directory
    pub fn resolve_image(&self, image: &Path) -> PathBuf {
        if image.is_absolute() {
            image.to_path_buf()
        } else {
            self.image_dir.join(image)
        }
    }

    pub fn render_match(&self, entry: &QuestionEntry) -> Response {
        let caption = format!("您可能想问：'{}'\n{}", entry.question, entry.answer.text());

        match &entry.answer {
            Answer::Rich { image: Some(image), .. } => {
                let path = self.resolve_image(image);
                if path.is_file() {
                    Response::Composite { text: caption, image: path }
                } else {
                    tracing::error!("Image file not found: {}", path.display());
                    Response::text(IMAGE_FAILURE)
                }
            }
            _ => Response::Text(caption),
        }
    }

    pub fn render_fallback(&self, suggestions: &[String]) -> Response {
        let mut text = FALLBACK_HEADER.to_string();
        if let Some(contact) = &self.contact {
            text.push_str(contact);
        }
        text.push_str(FALLBACK_SUGGEST);
        for key in suggestions {
            text.push('\n');
            text.push_str(key);
        }
        Response::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer_is_prefixed_with_question() {
        let responder = Responder::new("data");
        let entry = QuestionEntry::plain("学校简介", "欢迎来到本校");

        assert_eq!(
            responder.render_match(&entry),
            Response::text("您可能想问：'学校简介'\n欢迎来到本校")
        );
    }

    #[test]
    fn test_rich_answer_without_image_is_text() {
        let responder = Responder::new("data");
        let entry = QuestionEntry::rich("食堂", "共有三个食堂", None);

        assert_eq!(responder.render_match(&entry).as_text(), Some("您可能想问：'食堂'\n共有三个食堂"));
    }

    #[test]
    fn test_missing_image_gives_generic_failure() {
        let dir = tempfile::tempdir().unwrap();
        let responder = Responder::new(dir.path());
        let entry = QuestionEntry::rich("校园地图", "见下图", Some(PathBuf::from("nope.png")));

        assert_eq!(responder.render_match(&entry), Response::text(IMAGE_FAILURE));
    }

    #[test]
    fn test_existing_image_gives_composite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/map.png"), b"png").unwrap();

        let responder = Responder::new(dir.path());
        let entry = QuestionEntry::rich("校园地图", "见下图", Some(PathBuf::from("images/map.png")));

        assert_eq!(
            responder.render_match(&entry),
            Response::Composite {
                text: "您可能想问：'校园地图'\n见下图".to_string(),
                image: dir.path().join("images/map.png"),
            }
        );
    }

    #[test]
    fn test_absolute_image_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("a.png");
        let responder = Responder::new("elsewhere");

        assert_eq!(responder.resolve_image(&abs), abs);
        assert_eq!(responder.resolve_image(Path::new("a.png")), Path::new("elsewhere").join("a.png"));
    }

    #[test]
    fn test_fallback_lists_suggestions() {
        let responder = Responder::new("data");
        let keys = vec!["学校简介".to_string(), "录取分数线".to_string()];

        let text = responder.render_fallback(&keys);
        assert_eq!(
            text.as_text(),
            Some("未找到相关回答，请尝试其他关键词，或咨询其他学长。可以尝试以下关键词：\n学校简介\n录取分数线")
        );
    }

    #[test]
    fn test_fallback_includes_contact_line() {
        let responder = Responder::new("data").with_contact(Some("若要求补充回答可联系开发者阿咪。".to_string()));

        assert_eq!(
            responder.render_fallback(&["学校简介".to_string()]).as_text(),
            Some("未找到相关回答，请尝试其他关键词，或咨询其他学长。若要求补充回答可联系开发者阿咪。可以尝试以下关键词：\n学校简介")
        );
        let blank = Responder::new("data").with_contact(Some("  ".to_string()));
        assert!(!blank.render_fallback(&[]).as_text().unwrap().contains("  "));
    }
}
