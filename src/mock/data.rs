//! 可复现的 mock 数据生成：给定种子与时间点，生成结果完全确定。

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use rand::Rng;

use crate::model::{
    CalendarEvent, ChartDataPoint, DashboardStats, Document, DocumentStatus, FileItem, Message,
    Notification, NotificationKind, Task, TaskPriority, TaskStatus, User, UserStatus,
};
use crate::policy::{self, ROLES};

pub const DEMO_USER_ID: &str = "demo-user-001";

/// 姓氏与名字，附带拼音用于生成邮箱
const SURNAMES: &[(&str, &str)] = &[
    ("张", "zhang"),
    ("李", "li"),
    ("王", "wang"),
    ("刘", "liu"),
    ("陈", "chen"),
    ("杨", "yang"),
    ("黄", "huang"),
    ("赵", "zhao"),
    ("周", "zhou"),
    ("吴", "wu"),
    ("徐", "xu"),
    ("孙", "sun"),
    ("马", "ma"),
    ("朱", "zhu"),
    ("胡", "hu"),
];

const GIVEN_NAMES: &[(&str, &str)] = &[
    ("伟", "wei"),
    ("芳", "fang"),
    ("娜", "na"),
    ("秀英", "xiuying"),
    ("敏", "min"),
    ("静", "jing"),
    ("丽", "li"),
    ("强", "qiang"),
    ("磊", "lei"),
    ("洋", "yang"),
    ("艳", "yan"),
    ("勇", "yong"),
    ("军", "jun"),
    ("杰", "jie"),
    ("涛", "tao"),
];

const DEPARTMENTS: &[&str] = &[
    "技术部", "产品部", "运营部", "市场部", "财务部", "人事部", "行政部", "客服部",
];

const POSITIONS: &[&str] = &[
    "经理", "主管", "专员", "工程师", "设计师", "分析师", "助理", "总监",
];

const NOTIFICATION_TITLES: &[&str] = &[
    "系统更新通知",
    "新用户注册",
    "订单已完成",
    "安全警告",
    "数据备份完成",
    "新消息提醒",
    "任务已分配",
    "审批待处理",
];

const TASK_TITLES: &[&str] = &[
    "完成项目文档编写",
    "代码审查",
    "修复登录页面BUG",
    "设计新功能原型",
    "优化数据库查询",
    "编写单元测试",
    "准备周会材料",
    "更新API文档",
];

const EVENT_TITLES: &[&str] = &[
    "团队周会",
    "项目评审",
    "客户演示",
    "技术分享",
    "面试安排",
    "培训课程",
    "团建活动",
    "发布会议",
];

const EVENT_COLORS: &[&str] = &[
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899",
];

const MESSAGE_TEXTS: &[&str] = &[
    "你好，请问项目进度如何？",
    "我已经完成了文档更新。",
    "明天上午有空开个简短的会议吗？",
    "收到，我会尽快处理。",
    "数据报告已经发送到你的邮箱。",
    "有时间的话我们可以讨论一下方案。",
];

const DOC_TITLES: &[&str] = &[
    "项目需求文档",
    "技术架构设计",
    "API接口文档",
    "用户使用手册",
    "运维部署指南",
    "测试用例文档",
    "会议纪要",
    "产品规划方案",
];

const DOC_CATEGORIES: &[&str] = &["技术文档", "产品文档", "运营文档", "会议记录", "规范指南"];

const FILE_NAMES: &[&str] = &[
    "项目计划.xlsx",
    "设计稿.psd",
    "演示文稿.pptx",
    "需求文档.docx",
    "数据报表.pdf",
    "代码压缩包.zip",
    "图片素材.png",
    "视频教程.mp4",
];

const FILE_FOLDERS: &[&str] = &["项目文件", "设计资源", "文档资料", "其他"];

const TRAFFIC_SOURCES: &[(&str, i64, i64)] = &[
    ("直接访问", 1000, 5000),
    ("搜索引擎", 2000, 8000),
    ("社交媒体", 500, 3000),
    ("外部链接", 300, 1500),
    ("邮件营销", 200, 1000),
];

/// 各集合的生成数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSizes {
    pub users: usize,
    pub notifications: usize,
    pub tasks: usize,
    pub events: usize,
    pub documents: usize,
    pub files: usize,
    pub messages: usize,
    pub visit_days: usize,
    pub sales_months: usize,
}

impl Default for CollectionSizes {
    fn default() -> Self {
        Self {
            users: 20,
            notifications: 10,
            tasks: 8,
            events: 5,
            documents: 15,
            files: 12,
            messages: 6,
            visit_days: 30,
            sales_months: 12,
        }
    }
}

/// Mock API 持有的全部内存数据
#[derive(Debug, Clone)]
pub struct MockData {
    pub users: Vec<User>,
    pub stats: DashboardStats,
    pub visit_data: Vec<ChartDataPoint>,
    pub sales_data: Vec<ChartDataPoint>,
    pub traffic_data: Vec<ChartDataPoint>,
    pub notifications: Vec<Notification>,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub messages: Vec<Message>,
    pub documents: Vec<Document>,
    pub files: Vec<FileItem>,
}

impl MockData {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::generate_with(rng, CollectionSizes::default(), Utc::now())
    }

    pub fn generate_with<R: Rng>(
        rng: &mut R,
        sizes: CollectionSizes,
        now: DateTime<Utc>,
    ) -> Self {
        let mut g = Generator { rng, now };

        let users = g.users(sizes.users);
        // 文档、文件作者从用户池中选取，空池时退回演示账号
        let pool = if users.is_empty() {
            vec![demo_user()]
        } else {
            users.clone()
        };

        let mut data = Self {
            stats: g.stats(),
            visit_data: g.visit_data(sizes.visit_days),
            sales_data: g.sales_data(sizes.sales_months),
            traffic_data: g.traffic_data(),
            notifications: (0..sizes.notifications).map(|_| g.notification()).collect(),
            tasks: (0..sizes.tasks).map(|_| g.task()).collect(),
            events: (0..sizes.events).map(|_| g.event()).collect(),
            messages: Vec::with_capacity(sizes.messages),
            documents: (0..sizes.documents).map(|_| g.document(&pool)).collect(),
            files: (0..sizes.files).map(|_| g.file(&pool)).collect(),
            users,
        };
        data.messages = (0..sizes.messages)
            .map(|_| {
                let sender = g.pick(&pool).clone();
                g.message(sender, demo_user())
            })
            .collect();
        data
    }
}

/// 演示管理员账号
pub fn demo_user() -> User {
    User {
        id: DEMO_USER_ID.to_owned(),
        name: "管理员".to_owned(),
        email: "admin@halolight.h7ml.cn".to_owned(),
        phone: Some("13800138000".to_owned()),
        avatar: Some(avatar_url("admin")),
        role: policy::admin_role().clone(),
        status: UserStatus::Active,
        department: Some("技术部".to_owned()),
        position: Some("超级管理员".to_owned()),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        last_login_at: Some(Utc::now()),
    }
}

pub fn avatar_url(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={seed}")
}

struct Generator<'a, R> {
    rng: &'a mut R,
    now: DateTime<Utc>,
}

impl<R: Rng> Generator<'_, R> {
    fn pick<'s, T>(&mut self, items: &'s [T]) -> &'s T {
        &items[self.rng.random_range(0..items.len())]
    }

    fn int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// 保留两位小数
    fn float(&mut self, min: f64, max: f64) -> f64 {
        (self.rng.random_range(min..max) * 100.0).round() / 100.0
    }

    fn date_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
        let span = (end - start).num_milliseconds();
        if span <= 0 {
            return start;
        }
        start + Duration::milliseconds(self.rng.random_range(0..=span))
    }

    fn id(&mut self) -> String {
        let ts = self.now.timestamp_millis().max(0) as u64;
        ulid::Ulid::from_parts(ts, self.rng.random())
            .to_string()
            .to_lowercase()
    }

    fn users(&mut self, count: usize) -> Vec<User> {
        let since = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single().unwrap_or_default();
        let mut users: Vec<User> = Vec::with_capacity(count);

        for _ in 0..count {
            let (surname, surname_py) = *self.pick(SURNAMES);
            let (given, given_py) = *self.pick(GIVEN_NAMES);
            let (extra, extra_py) = if self.rng.random_bool(0.5) {
                *self.pick(GIVEN_NAMES)
            } else {
                ("", "")
            };
            let name = format!("{surname}{given}{extra}");
            let login = format!("{surname_py}{given_py}{extra_py}");

            // 同名时追加序号保证邮箱唯一
            let mut local = login.clone();
            let mut n = 1;
            while users.iter().any(|u| u.email == format!("{local}@example.com")) {
                n += 1;
                local = format!("{login}{n}");
            }

            let created_at = self.date_between(since, self.now);
            let statuses = [UserStatus::Active, UserStatus::Inactive, UserStatus::Suspended];
            users.push(User {
                id: self.id(),
                email: format!("{local}@example.com"),
                phone: Some(format!(
                    "1{}{}",
                    self.int(30, 99),
                    self.int(10_000_000, 99_999_999)
                )),
                avatar: Some(avatar_url(&local)),
                role: self.pick(&ROLES).clone(),
                status: *self.pick(&statuses),
                department: Some((*self.pick(DEPARTMENTS)).to_owned()),
                position: Some((*self.pick(POSITIONS)).to_owned()),
                last_login_at: Some(self.date_between(created_at, self.now)),
                created_at,
                name,
            });
        }
        users
    }

    fn stats(&mut self) -> DashboardStats {
        DashboardStats {
            total_users: self.int(10_000, 50_000) as u32,
            total_revenue: self.int(1_000_000, 10_000_000) as u64,
            total_orders: self.int(5_000, 20_000) as u32,
            conversion_rate: self.float(2.0, 8.0),
            user_growth: self.float(-5.0, 15.0),
            revenue_growth: self.float(-10.0, 25.0),
            order_growth: self.float(-5.0, 20.0),
        }
    }

    /// 最近 N 天，按日期升序，名称形如 `3/15`
    fn visit_data(&mut self, days: usize) -> Vec<ChartDataPoint> {
        (0..days)
            .rev()
            .map(|offset| {
                let day = self.now - Duration::days(offset as i64);
                ChartDataPoint::new(format!("{}/{}", day.month(), day.day()), self.int(1000, 5000))
                    .with("pv", self.int(2000, 8000))
                    .with("uv", self.int(1000, 5000))
            })
            .collect()
    }

    fn sales_data(&mut self, months: usize) -> Vec<ChartDataPoint> {
        (1..=months.min(12))
            .map(|m| {
                ChartDataPoint::new(format!("{m}月"), self.int(50_000, 200_000))
                    .with("orders", self.int(100, 500))
            })
            .collect()
    }

    fn traffic_data(&mut self) -> Vec<ChartDataPoint> {
        TRAFFIC_SOURCES
            .iter()
            .map(|&(name, min, max)| ChartDataPoint::new(name, self.int(min, max)))
            .collect()
    }

    fn notification(&mut self) -> Notification {
        let title = *self.pick(NOTIFICATION_TITLES);
        let kinds = [
            NotificationKind::Info,
            NotificationKind::Success,
            NotificationKind::Warning,
            NotificationKind::Error,
        ];
        Notification {
            id: self.id(),
            title: title.to_owned(),
            message: format!("这是一条关于\u{201c}{title}\u{201d}的详细说明信息。"),
            kind: *self.pick(&kinds),
            read: self.rng.random_bool(0.5),
            created_at: self.date_between(self.now - Duration::days(7), self.now),
        }
    }

    fn task(&mut self) -> Task {
        let statuses = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];
        let priorities = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];
        Task {
            id: self.id(),
            title: (*self.pick(TASK_TITLES)).to_owned(),
            description: Some("任务详细描述信息...".to_owned()),
            status: *self.pick(&statuses),
            priority: *self.pick(&priorities),
            due_date: Some(self.date_between(self.now, self.now + Duration::days(30))),
            assignee: None,
        }
    }

    fn event(&mut self) -> CalendarEvent {
        let start = self.date_between(self.now, self.now + Duration::days(7));
        let hours = self.int(1, 4);
        CalendarEvent {
            id: self.id(),
            title: (*self.pick(EVENT_TITLES)).to_owned(),
            description: Some("事件详细描述...".to_owned()),
            start,
            end: start + Duration::hours(hours),
            all_day: self.rng.random_bool(0.2),
            color: Some((*self.pick(EVENT_COLORS)).to_owned()),
        }
    }

    fn message(&mut self, sender: User, receiver: User) -> Message {
        Message {
            id: self.id(),
            content: (*self.pick(MESSAGE_TEXTS)).to_owned(),
            sender,
            receiver,
            read: self.rng.random_bool(0.7),
            created_at: self.date_between(self.now - Duration::days(1), self.now),
        }
    }

    fn document(&mut self, authors: &[User]) -> Document {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        let created_at = self.date_between(since, self.now);
        let statuses = [
            DocumentStatus::Draft,
            DocumentStatus::Published,
            DocumentStatus::Archived,
        ];
        Document {
            id: self.id(),
            title: (*self.pick(DOC_TITLES)).to_owned(),
            content: "文档内容...".to_owned(),
            category: (*self.pick(DOC_CATEGORIES)).to_owned(),
            tags: vec!["标签1".to_owned(), "标签2".to_owned()],
            author: self.pick(authors).clone(),
            status: *self.pick(&statuses),
            updated_at: self.date_between(created_at, self.now),
            created_at,
        }
    }

    fn file(&mut self, uploaders: &[User]) -> FileItem {
        let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        let name = *self.pick(FILE_NAMES);
        FileItem {
            id: self.id(),
            name: name.to_owned(),
            file_type: name.rsplit_once('.').map_or("unknown", |(_, ext)| ext).to_owned(),
            size: self.int(1024, 10 * 1024 * 1024) as u64,
            url: format!("/files/{name}"),
            folder: Some((*self.pick(FILE_FOLDERS)).to_owned()),
            uploaded_by: self.pick(uploaders).clone(),
            created_at: self.date_between(since, self.now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn generate(seed: u64) -> MockData {
        MockData::generate_with(
            &mut StdRng::seed_from_u64(seed),
            CollectionSizes::default(),
            fixed_now(),
        )
    }

    #[test]
    fn test_collection_sizes() {
        let data = generate(1);
        assert_eq!(data.users.len(), 20);
        assert_eq!(data.notifications.len(), 10);
        assert_eq!(data.tasks.len(), 8);
        assert_eq!(data.events.len(), 5);
        assert_eq!(data.documents.len(), 15);
        assert_eq!(data.files.len(), 12);
        assert_eq!(data.visit_data.len(), 30);
        assert_eq!(data.sales_data.len(), 12);
        assert_eq!(data.traffic_data.len(), 5);
        assert_eq!(data.visit_data.last().unwrap().name, "6/15");
        assert_eq!(data.sales_data[0].name, "1月");
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(42);
        let b = generate(42);
        assert_eq!(a.users, b.users);
        assert_eq!(a.documents, b.documents);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_users_are_consistent() {
        let data = generate(7);
        let mut emails: Vec<_> = data.users.iter().map(|u| u.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), data.users.len());

        for user in &data.users {
            assert!(user.email.is_ascii());
            assert!(user.email.ends_with("@example.com"));
            assert!(user.created_at <= fixed_now());
            assert!(user.last_login_at.unwrap() >= user.created_at);
            // 张姓用户的邮箱以 zhang 开头
            assert_eq!(user.name.starts_with('张'), user.email.starts_with("zhang"));
        }
    }

    #[test]
    fn test_value_ranges() {
        let data = generate(3);
        assert!((10_000..=50_000).contains(&data.stats.total_users));
        for file in &data.files {
            assert!((1024..=10 * 1024 * 1024).contains(&file.size));
            assert!(file.name.ends_with(&format!(".{}", file.file_type)));
        }
        for event in &data.events {
            let hours = (event.end - event.start).num_hours();
            assert!((1..=4).contains(&hours));
        }
    }

    #[test]
    fn test_demo_user() {
        let user = demo_user();
        assert_eq!(user.id, DEMO_USER_ID);
        assert_eq!(user.role.id, "admin");
        assert_eq!(crate::model::iso(&user.created_at), "2024-01-01T00:00:00.000Z");
    }
}
