//! UI components and the endpoints they depend on.

use crate::client::Endpoint;
use serde::{Deserialize, Serialize};

/// One auditable UI component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: &'static str,
    /// Declaration order matters: the first entry is the sampled one
    pub dependencies: &'static [Endpoint],
}

impl ComponentSpec {
    pub const fn new(name: &'static str, dependencies: &'static [Endpoint]) -> Self {
        Self { name, dependencies }
    }
}

/// Overall verdict for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Pending,
    Ok,
    Fail,
}

/// Audit outcome for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAudit {
    pub name: String,
    pub api_dependencies: Vec<String>,
    pub status: AuditStatus,
    /// Every dependency resolves to a route
    pub import_verified: bool,
    /// Sampled calls settled successfully
    pub call_verified: bool,
    /// Sampled calls returned payloads
    pub payload_valid: bool,
    pub error_log: Option<String>,
}

impl ComponentAudit {
    pub fn pending(spec: &ComponentSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            api_dependencies: spec
                .dependencies
                .iter()
                .map(|e| e.path().to_string())
                .collect(),
            status: AuditStatus::Pending,
            import_verified: false,
            call_verified: false,
            payload_valid: false,
            error_log: None,
        }
    }
}

use Endpoint::*;

/// Screens and widgets of the client app.
pub const COMPONENTS: &[ComponentSpec] = &[
    ComponentSpec::new("LoginScreen", &[AuthLogin, AuthRegister, AuthForgotPassword]),
    ComponentSpec::new("HomeFeed", &[StreamsGetLive, StreamsGetFeatured, BannersList]),
    ComponentSpec::new("ExploreScreen", &[StreamsGetCategories, StreamsGetNearby, SearchTrending]),
    ComponentSpec::new("StreamRoom", &[StreamsGet, StreamsJoin, ChatGetMessages, StreamsGetViewers]),
    ComponentSpec::new("GoLiveScreen", &[StreamsStart, LiveGetStreamKey, LiveGetRtcToken]),
    ComponentSpec::new("LiveChat", &[ChatGetMessages, ChatSendMessage]),
    ComponentSpec::new("GiftPanel", &[GiftsList, WalletGetBalance, GiftsSend]),
    ComponentSpec::new("ProfileScreen", &[UsersGetMe, UsersGetFollowers, UsersGetFollowing]),
    ComponentSpec::new("EditProfile", &[UsersUpdateProfile, UsersUploadAvatar]),
    ComponentSpec::new("FriendsList", &[UsersGetFriends, UsersGetBlocked]),
    ComponentSpec::new("Messages", &[ChatGetConversations, ChatGetConversation]),
    ComponentSpec::new("WalletScreen", &[WalletGetBalance, WalletGetTransactions, WalletGetPackages]),
    ComponentSpec::new("DiamondStore", &[WalletGetPackages, WalletPurchase]),
    ComponentSpec::new("PkBattle", &[PkGetActive, PkInvite]),
    ComponentSpec::new("Leaderboard", &[RankingsGetDaily, RankingsGetWeekly, RankingsGetMonthly]),
    ComponentSpec::new("NotificationCenter", &[NotificationsList, NotificationsMarkAllRead]),
    ComponentSpec::new("SettingsScreen", &[SettingsGet, SettingsGetPrivacy]),
    ComponentSpec::new("VipCenter", &[VipGetPlans, VipGetStatus]),
    ComponentSpec::new("DailyTasks", &[TasksGetDaily, TasksClaim]),
    ComponentSpec::new("AdminPanel", &[AdminGetStats, AdminGetUsers, AdminGetSystemHealth]),
    ComponentSpec::new("SplashScreen", &[]),
    ComponentSpec::new("ThemeToggle", &[]),
    ComponentSpec::new("LanguageSelector", &[]),
    ComponentSpec::new("AboutScreen", &[SystemGetVersion]),
];
