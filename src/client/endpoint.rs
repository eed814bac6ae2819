//! Endpoint registry.
//!
//! Every backend endpoint the client exposes is one row of the table below:
//! its group, dotted name, HTTP route and the dummy arguments used when the
//! endpoint is probed. Rows without explicit arguments are probed with none.

use super::args::{CallArgs, Route};
use crate::dispatch::HttpMethod;
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Login used when probing authentication endpoints.
pub const PROBE_EMAIL: &str = "admin@livego.com";
pub const PROBE_PASSWORD: &str = "123";
/// Identifier used for path-parameterised endpoints.
pub const PROBE_ID: &str = "1";

macro_rules! endpoints {
    ($( $variant:ident => $group:literal, $path:literal, $method:ident $route:literal $(, $args:expr)? ;)*) => {
        /// A backend endpoint known to the client.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Endpoint {
            $($variant,)*
        }

        impl Endpoint {
            /// Every endpoint, in declaration order.
            pub const ALL: &'static [Endpoint] = &[$(Endpoint::$variant,)*];

            /// Category label.
            pub const fn group(self) -> &'static str {
                match self {
                    $(Endpoint::$variant => $group,)*
                }
            }

            /// Dotted accessor name, e.g. `users.getFriends`.
            pub const fn path(self) -> &'static str {
                match self {
                    $(Endpoint::$variant => $path,)*
                }
            }

            pub const fn route(self) -> Route {
                match self {
                    $(Endpoint::$variant => Route::new(HttpMethod::$method, $route),)*
                }
            }

            /// Arguments synthesised for probing this endpoint.
            pub fn dummy_args(self) -> CallArgs {
                match self {
                    $(Endpoint::$variant => endpoints!(@args $($args)?),)*
                }
            }
        }
    };
    (@args) => { CallArgs::None };
    (@args $args:expr) => { $args };
}

endpoints! {
    // Auth
    AuthLogin => "Auth", "auth.login", Post "/auth/login", CallArgs::credentials(PROBE_EMAIL, PROBE_PASSWORD);
    AuthRegister => "Auth", "auth.register", Post "/auth/register", CallArgs::credentials(PROBE_EMAIL, PROBE_PASSWORD);
    AuthLogout => "Auth", "auth.logout", Post "/auth/logout";
    AuthMe => "Auth", "auth.me", Get "/auth/me";
    AuthRefreshToken => "Auth", "auth.refreshToken", Post "/auth/refresh";
    AuthForgotPassword => "Auth", "auth.forgotPassword", Post "/auth/forgot-password", CallArgs::body(json!({"email": PROBE_EMAIL}));
    AuthResetPassword => "Auth", "auth.resetPassword", Post "/auth/reset-password", CallArgs::body(json!({"code": "000000", "password": PROBE_PASSWORD}));
    AuthVerifyEmail => "Auth", "auth.verifyEmail", Post "/auth/verify-email", CallArgs::body(json!({"code": "000000"}));

    // Users
    UsersGetMe => "Users", "users.getMe", Get "/users/me";
    UsersUpdateProfile => "Users", "users.updateProfile", Put "/users/me", CallArgs::body(json!({"bio": "diagnostic probe"}));
    UsersGetUser => "Users", "users.getUser", Get "/users/{id}", CallArgs::id(PROBE_ID);
    UsersSearch => "Users", "users.search", Get "/users/search?q=live";
    UsersGetFriends => "Users", "users.getFriends", Get "/users/friends";
    UsersGetFollowers => "Users", "users.getFollowers", Get "/users/{id}/followers", CallArgs::id(PROBE_ID);
    UsersGetFollowing => "Users", "users.getFollowing", Get "/users/{id}/following", CallArgs::id(PROBE_ID);
    UsersFollow => "Users", "users.follow", Post "/users/{id}/follow", CallArgs::id(PROBE_ID);
    UsersUnfollow => "Users", "users.unfollow", Delete "/users/{id}/follow", CallArgs::id(PROBE_ID);
    UsersBlock => "Users", "users.block", Post "/users/{id}/block", CallArgs::id(PROBE_ID);
    UsersUnblock => "Users", "users.unblock", Delete "/users/{id}/block", CallArgs::id(PROBE_ID);
    UsersGetBlocked => "Users", "users.getBlocked", Get "/users/blocked";
    UsersReport => "Users", "users.report", Post "/users/{id}/report", CallArgs::id_and_body(PROBE_ID, json!({"reason": "spam"}));
    UsersGetVisitors => "Users", "users.getVisitors", Get "/users/me/visitors";
    UsersUploadAvatar => "Users", "users.uploadAvatar", Post "/users/me/avatar", CallArgs::body(json!({"url": "https://cdn.livego.dev/probe.png"}));

    // Streams
    StreamsList => "Streams", "streams.list", Get "/streams";
    StreamsGetLive => "Streams", "streams.getLive", Get "/streams/live";
    StreamsGetFeatured => "Streams", "streams.getFeatured", Get "/streams/featured";
    StreamsGetNearby => "Streams", "streams.getNearby", Get "/streams/nearby";
    StreamsGetFollowing => "Streams", "streams.getFollowing", Get "/streams/following";
    StreamsGet => "Streams", "streams.get", Get "/streams/{id}", CallArgs::id(PROBE_ID);
    StreamsStart => "Streams", "streams.start", Post "/streams", CallArgs::body(json!({"title": "Diagnostic stream"}));
    StreamsEnd => "Streams", "streams.end", Post "/streams/{id}/end", CallArgs::id(PROBE_ID);
    StreamsJoin => "Streams", "streams.join", Post "/streams/{id}/join", CallArgs::id(PROBE_ID);
    StreamsLeave => "Streams", "streams.leave", Post "/streams/{id}/leave", CallArgs::id(PROBE_ID);
    StreamsGetViewers => "Streams", "streams.getViewers", Get "/streams/{id}/viewers", CallArgs::id(PROBE_ID);
    StreamsLike => "Streams", "streams.like", Post "/streams/{id}/like", CallArgs::id(PROBE_ID);
    StreamsGetCategories => "Streams", "streams.getCategories", Get "/streams/categories";
    StreamsSearch => "Streams", "streams.search", Get "/streams/search?q=live";
    StreamsGetHistory => "Streams", "streams.getHistory", Get "/streams/history";

    // Chat
    ChatGetMessages => "Chat", "chat.getMessages", Get "/streams/{id}/messages", CallArgs::id(PROBE_ID);
    ChatSendMessage => "Chat", "chat.sendMessage", Post "/streams/{id}/messages", CallArgs::id_and_body(PROBE_ID, json!({"text": "ping"}));
    ChatDeleteMessage => "Chat", "chat.deleteMessage", Delete "/messages/{id}", CallArgs::id(PROBE_ID);
    ChatMuteUser => "Chat", "chat.muteUser", Post "/streams/{id}/mute", CallArgs::id_and_body(PROBE_ID, json!({"userId": PROBE_ID}));
    ChatGetConversations => "Chat", "chat.getConversations", Get "/conversations";
    ChatGetConversation => "Chat", "chat.getConversation", Get "/conversations/{id}", CallArgs::id(PROBE_ID);
    ChatSendDirect => "Chat", "chat.sendDirect", Post "/conversations/{id}/messages", CallArgs::id_and_body(PROBE_ID, json!({"text": "ping"}));

    // Gifts
    GiftsList => "Gifts", "gifts.list", Get "/gifts";
    GiftsGetCategories => "Gifts", "gifts.getCategories", Get "/gifts/categories";
    GiftsSend => "Gifts", "gifts.send", Post "/gifts/send", CallArgs::body(json!({"giftId": "rose", "streamId": PROBE_ID, "quantity": 1}));
    GiftsGetHistory => "Gifts", "gifts.getHistory", Get "/gifts/history";
    GiftsGetReceived => "Gifts", "gifts.getReceived", Get "/gifts/received";
    GiftsGetTopGifters => "Gifts", "gifts.getTopGifters", Get "/streams/{id}/top-gifters", CallArgs::id(PROBE_ID);

    // Wallet
    WalletGetBalance => "Wallet", "wallet.getBalance", Get "/wallet/balance";
    WalletGetTransactions => "Wallet", "wallet.getTransactions", Get "/wallet/transactions";
    WalletGetPackages => "Wallet", "wallet.getPackages", Get "/wallet/packages";
    WalletPurchase => "Wallet", "wallet.purchase", Post "/wallet/purchase", CallArgs::body(json!({"packageId": "pkg-100"}));
    WalletWithdraw => "Wallet", "wallet.withdraw", Post "/wallet/withdraw", CallArgs::body(json!({"amount": 1}));
    WalletGetWithdrawals => "Wallet", "wallet.getWithdrawals", Get "/wallet/withdrawals";
    WalletExchange => "Wallet", "wallet.exchange", Post "/wallet/exchange", CallArgs::body(json!({"diamonds": 1}));
    WalletGetEarnings => "Wallet", "wallet.getEarnings", Get "/wallet/earnings";
    WalletGetPaymentMethods => "Wallet", "wallet.getPaymentMethods", Get "/wallet/payment-methods";
    WalletAddPaymentMethod => "Wallet", "wallet.addPaymentMethod", Post "/wallet/payment-methods", CallArgs::body(json!({"type": "card", "token": "tok_probe"}));

    // Diamonds
    DiamondsGetBalance => "Diamonds", "diamonds.getBalance", Get "/diamonds/balance";
    DiamondsGetHistory => "Diamonds", "diamonds.getHistory", Get "/diamonds/history";
    DiamondsTransfer => "Diamonds", "diamonds.transfer", Post "/diamonds/transfer", CallArgs::body(json!({"to": PROBE_ID, "amount": 1}));
    DiamondsGetRates => "Diamonds", "diamonds.getRates", Get "/diamonds/rates";

    // PK battles
    PkGetActive => "PK", "pk.getActive", Get "/pk/active";
    PkInvite => "PK", "pk.invite", Post "/pk/invite", CallArgs::body(json!({"opponentId": PROBE_ID}));
    PkAccept => "PK", "pk.accept", Post "/pk/{id}/accept", CallArgs::id(PROBE_ID);
    PkDecline => "PK", "pk.decline", Post "/pk/{id}/decline", CallArgs::id(PROBE_ID);
    PkEnd => "PK", "pk.end", Post "/pk/{id}/end", CallArgs::id(PROBE_ID);
    PkGetHistory => "PK", "pk.getHistory", Get "/pk/history";

    // Rankings
    RankingsGetDaily => "Rankings", "rankings.getDaily", Get "/rankings/daily";
    RankingsGetWeekly => "Rankings", "rankings.getWeekly", Get "/rankings/weekly";
    RankingsGetMonthly => "Rankings", "rankings.getMonthly", Get "/rankings/monthly";
    RankingsGetHosts => "Rankings", "rankings.getHosts", Get "/rankings/hosts";
    RankingsGetGifters => "Rankings", "rankings.getGifters", Get "/rankings/gifters";

    // Notifications
    NotificationsList => "Notifications", "notifications.list", Get "/notifications";
    NotificationsMarkRead => "Notifications", "notifications.markRead", Post "/notifications/{id}/read", CallArgs::id(PROBE_ID);
    NotificationsMarkAllRead => "Notifications", "notifications.markAllRead", Post "/notifications/read-all";
    NotificationsGetSettings => "Notifications", "notifications.getSettings", Get "/notifications/settings";
    NotificationsUpdateSettings => "Notifications", "notifications.updateSettings", Put "/notifications/settings", CallArgs::body(json!({"push": true}));

    // Settings
    SettingsGet => "Settings", "settings.get", Get "/settings";
    SettingsUpdate => "Settings", "settings.update", Put "/settings", CallArgs::body(json!({"language": "en"}));
    SettingsGetPrivacy => "Settings", "settings.getPrivacy", Get "/settings/privacy";
    SettingsUpdatePrivacy => "Settings", "settings.updatePrivacy", Put "/settings/privacy", CallArgs::body(json!({"showLocation": false}));
    SettingsChangePassword => "Settings", "settings.changePassword", Post "/settings/password", CallArgs::body(json!({"current": PROBE_PASSWORD, "next": PROBE_PASSWORD}));
    SettingsDeleteAccount => "Settings", "settings.deleteAccount", Delete "/settings/account";

    // Levels and VIP
    LevelsGetMine => "Levels", "levels.getMine", Get "/levels/me";
    LevelsGetRewards => "Levels", "levels.getRewards", Get "/levels/rewards";
    VipGetPlans => "VIP", "vip.getPlans", Get "/vip/plans";
    VipSubscribe => "VIP", "vip.subscribe", Post "/vip/subscribe", CallArgs::body(json!({"planId": "vip-monthly"}));
    VipGetStatus => "VIP", "vip.getStatus", Get "/vip/status";

    // Agencies and hosts
    AgencyGet => "Agency", "agency.get", Get "/agency";
    AgencyJoin => "Agency", "agency.join", Post "/agency/{id}/join", CallArgs::id(PROBE_ID);
    AgencyGetMembers => "Agency", "agency.getMembers", Get "/agency/{id}/members", CallArgs::id(PROBE_ID);
    HostApply => "Agency", "host.apply", Post "/host/apply", CallArgs::body(json!({"category": "music"}));
    HostGetStats => "Agency", "host.getStats", Get "/host/stats";

    // Tasks, events, banners
    TasksGetDaily => "Tasks", "tasks.getDaily", Get "/tasks/daily";
    TasksClaim => "Tasks", "tasks.claim", Post "/tasks/{id}/claim", CallArgs::id(PROBE_ID);
    EventsList => "Events", "events.list", Get "/events";
    EventsGet => "Events", "events.get", Get "/events/{id}", CallArgs::id(PROBE_ID);
    BannersList => "Events", "banners.list", Get "/banners";

    // Moderation
    ModerationGetReports => "Moderation", "moderation.getReports", Get "/moderation/reports";
    ModerationResolve => "Moderation", "moderation.resolve", Post "/moderation/reports/{id}/resolve", CallArgs::id(PROBE_ID);
    ModerationBan => "Moderation", "moderation.ban", Post "/moderation/users/{id}/ban", CallArgs::id(PROBE_ID);
    ModerationGetBans => "Moderation", "moderation.getBans", Get "/moderation/bans";

    // Admin
    AdminGetStats => "Admin", "admin.getStats", Get "/admin/stats";
    AdminGetUsers => "Admin", "admin.getUsers", Get "/admin/users";
    AdminGetStreams => "Admin", "admin.getStreams", Get "/admin/streams";
    AdminUpdateUser => "Admin", "admin.updateUser", Put "/admin/users/{id}", CallArgs::id_and_body(PROBE_ID, json!({"status": "active"}));
    AdminGetTransactions => "Admin", "admin.getTransactions", Get "/admin/transactions";
    AdminGetSystemHealth => "Admin", "admin.getSystemHealth", Get "/admin/health";

    // Media and realtime signalling
    MediaGetUploadUrl => "Media", "media.getUploadUrl", Post "/media/upload-url", CallArgs::body(json!({"contentType": "image/png"}));
    LiveGetRtcToken => "Media", "live.getRtcToken", Post "/streams/{id}/rtc-token", CallArgs::id(PROBE_ID);
    LiveGetIceServers => "Media", "live.getIceServers", Get "/rtc/ice-servers";
    LiveGetStreamKey => "Media", "live.getStreamKey", Get "/streams/{id}/key", CallArgs::id(PROBE_ID);

    // Search
    SearchGlobal => "Search", "search.global", Get "/search?q=live";
    SearchTrending => "Search", "search.trending", Get "/search/trending";
    SearchSuggestions => "Search", "search.suggestions", Get "/search/suggestions";

    // System
    SystemGetConfig => "System", "system.getConfig", Get "/config";
    SystemGetVersion => "System", "system.getVersion", Get "/version";
    SystemHealth => "System", "system.health", Get "/health";
    SystemGetCountries => "System", "system.getCountries", Get "/config/countries";
}

impl Endpoint {
    /// Look up an endpoint by its dotted name.
    pub fn from_path(path: &str) -> Option<Endpoint> {
        Self::ALL.iter().copied().find(|e| e.path() == path)
    }

    pub fn descriptor(self) -> EndpointDescriptor {
        let route = self.route();
        EndpointDescriptor {
            group: self.group(),
            path: self.path(),
            method: route.method,
            route: route.template,
            default_args: self.dummy_args(),
        }
    }

    /// Distinct groups in declaration order.
    pub fn groups() -> Vec<&'static str> {
        let mut groups: Vec<&'static str> = Vec::new();
        for endpoint in Self::ALL {
            if !groups.contains(&endpoint.group()) {
                groups.push(endpoint.group());
            }
        }
        groups
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Serializable view of one registry row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointDescriptor {
    pub group: &'static str,
    pub path: &'static str,
    pub method: HttpMethod,
    pub route: &'static str,
    pub default_args: CallArgs,
}
