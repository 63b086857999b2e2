//! Command router - Routes parsed commands to their handlers

use std::sync::{PoisonError, RwLock};

use crate::application::errors::CommandError;
use crate::application::services::{QaService, WhitelistOutcome, WhitelistStore};
use crate::domain::entities::{ChatContext, Command, CommandRegistry, Content, Permission, Response};
use super::parser::MessageParser;

pub const QUESTION_COMMAND: &str = "提问";
pub const WHITELIST_COMMAND: &str = "咨询群聊配置";
pub const HELP_COMMAND: &str = "帮助";

const WHITELIST_USAGE: &str = "用法：/咨询群聊配置 <新增|删除> <群号> 或 /咨询群聊配置 list";
const INVALID_GROUP_ID: &str = "❌ 群号必须为纯数字，例如：12345678";
const PERMISSION_DENIED: &str = "❌ 权限不足，仅管理员可操作";

/// Routes commands to the QA and whitelist handlers.
///
/// The question command is gated by the group whitelist; requests from
/// groups that are not listed, or from private chats, get no response.
pub struct CommandRouter {
    parser: MessageParser,
    registry: CommandRegistry,
    qa: QaService,
    whitelist: RwLock<WhitelistStore>,
    admins: Vec<String>,
}

impl CommandRouter {
    pub fn new(prefix: impl Into<String>, qa: QaService, whitelist: WhitelistStore, admins: Vec<String>) -> Self {
        let mut router = Self {
            parser: MessageParser::new(prefix),
            registry: CommandRegistry::new(),
            qa,
            whitelist: RwLock::new(whitelist),
            admins,
        };
        router.register_defaults();
        router
    }

    fn register_defaults(&mut self) {
        self.registry.register(
            Command::new(QUESTION_COMMAND)
                .with_description("模糊匹配问答库并回答（仅限白名单群聊）")
                .with_usage("/提问 <问题>")
                .with_aliases(vec!["ask".to_string()]),
        );

        self.registry.register(
            Command::new(WHITELIST_COMMAND)
                .with_description("白名单管理（仅管理员）")
                .with_usage(WHITELIST_USAGE)
                .with_aliases(vec!["whitelist".to_string()])
                .admin_only(),
        );

        self.registry.register(
            Command::new(HELP_COMMAND)
                .with_description("显示可用指令")
                .with_usage("/帮助")
                .with_aliases(vec!["help".to_string()]),
        );
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|a| a == user_id)
    }

    pub fn is_allowed(&self, group_id: &str) -> bool {
        self.whitelist.read().unwrap_or_else(PoisonError::into_inner).is_allowed(group_id)
    }

    /// Current whitelist in insertion order
    pub fn whitelist(&self) -> Vec<String> {
        self.whitelist.read().unwrap_or_else(PoisonError::into_inner).list().to_vec()
    }

    /// Parse raw chat text and dispatch it if it is a command
    pub fn handle_text(&self, text: &str, ctx: &ChatContext) -> Response {
        match self.parser.parse_content(text) {
            Content::Command { name, args } => self.dispatch(&name, &args, ctx),
            _ => Response::Silent,
        }
    }

    pub fn dispatch(&self, command: &str, args: &[String], ctx: &ChatContext) -> Response {
        let Some(cmd) = self.registry.find(command) else {
            tracing::debug!("Ignoring unknown command /{}", command);
            return Response::Silent;
        };

        let result = match cmd.name.as_str() {
            _ if !self.permits(cmd.permission, ctx) => Err(CommandError::PermissionDenied),
            QUESTION_COMMAND => Ok(self.ask(args, ctx)),
            WHITELIST_COMMAND => {
                let mut whitelist = self.whitelist.write().unwrap_or_else(PoisonError::into_inner);
                manage_whitelist(&mut whitelist, args)
            }
            HELP_COMMAND => Ok(Response::Text(self.help())),
            other => Err(CommandError::NotFound(other.to_string())),
        };

        match result {
            Ok(response) => response,
            Err(CommandError::PermissionDenied) => {
                tracing::warn!("User {:?} is not allowed to run /{}", ctx.user_id, cmd.name);
                Response::text(PERMISSION_DENIED)
            }
            Err(CommandError::Validation(e)) => {
                tracing::warn!("Rejected /{}: {}", cmd.name, e);
                Response::text(INVALID_GROUP_ID)
            }
            Err(CommandError::InvalidArgs(usage)) => Response::Text(usage),
            Err(e) => {
                tracing::error!("Command /{} failed: {}", cmd.name, e);
                Response::Text(format!("❌ 操作失败：{}", e))
            }
        }
    }

    fn permits(&self, permission: Permission, ctx: &ChatContext) -> bool {
        match permission {
            Permission::Everyone => true,
            Permission::Admin => ctx.user_id.as_deref().is_some_and(|u| self.is_admin(u)),
        }
    }

    fn ask(&self, args: &[String], ctx: &ChatContext) -> Response {
        let Some(group_id) = ctx.group_id.as_deref() else {
            tracing::info!("Question from a private chat ignored");
            return Response::Silent;
        };
        if !self.is_allowed(group_id) {
            tracing::info!("Group {} is not whitelisted, request dropped", group_id);
            return Response::Silent;
        }

        self.qa.answer(&args.join(" "))
    }

    pub fn help(&self) -> String {
        let mut help = "可用指令：\n".to_string();
        for cmd in self.registry.all() {
            let usage = cmd.usage.as_deref().unwrap_or(&cmd.name);
            let description = cmd.description.as_deref().unwrap_or("");
            help.push_str(&format!("  {} - {}\n", usage, description));
        }
        help
    }
}

/// Admin sub-commands; takes the whitelist handle explicitly
fn manage_whitelist(whitelist: &mut WhitelistStore, args: &[String]) -> Result<Response, CommandError> {
    let usage = || CommandError::InvalidArgs(WHITELIST_USAGE.to_string());

    match args.first().map(|s| s.as_str()) {
        Some("新增") | Some("add") => {
            let group_id = args.get(1).ok_or_else(usage)?;
            let text = match whitelist.add(group_id)? {
                WhitelistOutcome::AlreadyPresent => format!("⚠️ 群 {} 已在白名单中", group_id),
                _ => format!("✅ 已添加群 {} 到白名单", group_id),
            };
            Ok(Response::Text(text))
        }
        Some("删除") | Some("remove") => {
            let group_id = args.get(1).ok_or_else(usage)?;
            let text = match whitelist.remove(group_id)? {
                WhitelistOutcome::NotPresent => format!("⚠️ 群 {} 不在白名单中", group_id),
                _ => format!("✅ 已从白名单移除群 {}", group_id),
            };
            Ok(Response::Text(text))
        }
        Some(sub) if sub.eq_ignore_ascii_case("list") || sub == "列表" => {
            if whitelist.list().is_empty() {
                Ok(Response::text("当前白名单为空"))
            } else {
                Ok(Response::Text(format!("白名单群号列表：\n{}", whitelist.list().join("\n"))))
            }
        }
        _ => Err(usage()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::application::services::Responder;
    use crate::domain::entities::{QaStore, QuestionEntry};
    use crate::infrastructure::storage::MemoryConfigStore;

    fn router(groups: &[&str]) -> (CommandRouter, Arc<MemoryConfigStore>) {
        let persistence = Arc::new(MemoryConfigStore::new(groups.iter().map(|g| g.to_string()).collect()));
        let whitelist = WhitelistStore::load(persistence.clone()).unwrap();
        let store = QaStore::from_entries(vec![QuestionEntry::plain("学校简介", "欢迎来到本校")]);
        let qa = QaService::with_responder(store, Responder::new("data"));
        (CommandRouter::new("/", qa, whitelist, vec!["admin".to_string()]), persistence)
    }

    fn admin() -> ChatContext {
        ChatContext::group("999").with_user("admin")
    }

    #[test]
    fn test_question_in_whitelisted_group() {
        let (router, _) = router(&["100"]);
        let response = router.handle_text("/提问 学校简介", &ChatContext::group("100"));

        assert_eq!(response, Response::text("您可能想问：'学校简介'\n欢迎来到本校"));
    }

    #[test]
    fn test_question_outside_whitelist_is_silent() {
        let (router, _) = router(&["100"]);

        assert!(router.handle_text("/提问 学校简介", &ChatContext::group("200")).is_silent());
        assert!(router.handle_text("/提问 学校简介", &ChatContext::private("u1")).is_silent());
    }

    #[test]
    fn test_question_without_args_gets_hint() {
        let (router, _) = router(&["100"]);
        let response = router.dispatch(QUESTION_COMMAND, &[], &ChatContext::group("100"));

        assert_eq!(response.as_text(), Some("请输入问题关键词，例如：/提问 学校简介"));
    }

    #[test]
    fn test_add_then_list() {
        let (router, persistence) = router(&[]);

        assert_eq!(
            router.handle_text("/咨询群聊配置 新增 12345678", &admin()),
            Response::text("✅ 已添加群 12345678 到白名单")
        );
        assert_eq!(
            router.handle_text("/咨询群聊配置 新增 12345678", &admin()),
            Response::text("⚠️ 群 12345678 已在白名单中")
        );
        assert_eq!(
            router.handle_text("/咨询群聊配置 list", &admin()),
            Response::text("白名单群号列表：\n12345678")
        );

        assert_eq!(persistence.whitelist(), vec!["12345678".to_string()]);
        assert!(router.is_allowed("12345678"));
    }

    #[test]
    fn test_remove_and_warnings() {
        let (router, _) = router(&["100"]);

        assert_eq!(
            router.handle_text("/咨询群聊配置 删除 200", &admin()),
            Response::text("⚠️ 群 200 不在白名单中")
        );
        assert_eq!(
            router.handle_text("/咨询群聊配置 删除 100", &admin()),
            Response::text("✅ 已从白名单移除群 100")
        );
        assert_eq!(
            router.handle_text("/咨询群聊配置 list", &admin()),
            Response::text("当前白名单为空")
        );
    }

    #[test]
    fn test_invalid_group_id_is_rejected() {
        let (router, persistence) = router(&[]);

        assert_eq!(router.handle_text("/咨询群聊配置 新增 abc", &admin()), Response::text(INVALID_GROUP_ID));
        assert!(router.whitelist().is_empty());
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_missing_arguments_show_usage() {
        let (router, _) = router(&[]);

        assert_eq!(router.handle_text("/咨询群聊配置 新增", &admin()), Response::text(WHITELIST_USAGE));
        assert_eq!(router.handle_text("/咨询群聊配置", &admin()), Response::text(WHITELIST_USAGE));
    }

    #[test]
    fn test_non_admin_cannot_manage_whitelist() {
        let (router, _) = router(&[]);

        let response = router.handle_text("/咨询群聊配置 新增 123", &ChatContext::group("1").with_user("guest"));
        assert_eq!(response, Response::text(PERMISSION_DENIED));
        assert!(router.whitelist().is_empty());
    }

    #[test]
    fn test_admin_command_without_sender_is_denied() {
        let (router, persistence) = router(&[]);

        let args = vec!["新增".to_string(), "1".to_string()];
        let response = router.dispatch(WHITELIST_COMMAND, &args, &ChatContext::group("1"));
        assert_eq!(response, Response::text(PERMISSION_DENIED));
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_aliases_and_unknown_commands() {
        let (router, _) = router(&["100"]);

        assert!(!router.handle_text("/ask 学校简介", &ChatContext::group("100")).is_silent());
        assert!(router.handle_text("/weather", &ChatContext::group("100")).is_silent());
        assert!(router.handle_text("学校简介", &ChatContext::group("100")).is_silent());
    }

    #[test]
    fn test_failed_save_is_reported() {
        let persistence = Arc::new(MemoryConfigStore::default().failing_saves());
        let whitelist = WhitelistStore::load(persistence).unwrap();
        let qa = QaService::with_responder(QaStore::new(), Responder::new("data"));
        let router = CommandRouter::new("/", qa, whitelist, vec!["admin".to_string()]);

        let response = router.handle_text("/咨询群聊配置 新增 123", &admin());
        assert!(response.as_text().unwrap().starts_with("❌ 操作失败"));
        assert!(!router.is_allowed("123"));
    }

    #[test]
    fn test_help_lists_commands() {
        let (router, _) = router(&[]);
        let help = router.help();

        assert!(help.starts_with("可用指令：\n"));
        assert!(help.contains("  /提问 <问题> - 模糊匹配问答库并回答（仅限白名单群聊）\n"));
        assert!(help.contains(WHITELIST_USAGE));
        assert_eq!(help.lines().count(), 4);
    }
}
