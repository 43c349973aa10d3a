//! 导航外壳的状态
//!
//! 菜单是静态表，活动屏幕只保存在内存中，刷新页面总是回到报表视图。

use crate::resources;
use crate::schema::ResourceSchema;
use crate::session::Role;
use std::collections::BTreeSet;

// =========================================================
// 屏幕
// =========================================================

/// 外壳可以挂载的屏幕
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Reports,
    Categories,
    Patients,
    RegisterPatient,
    Stocks,
    AddStock,
    Prescriptions,
    NewPrescription,
    DailyPharmacyExpenses,
    TakenExpenses,
    Staff,
    TestTypes,
    Lab,
    Users,
    Receptions,
    ReceptionCategories,
    BlogCategories,
    BlogPosts,
    Slider,
    Services,
    DesignCategories,
    AttributeChoices,
    Attributes,
    AttributeValues,
    RegularStaff,
    Profile,
}

/// 屏幕如何使用它的资源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    /// 列表 + 新建/编辑/删除
    Manage(&'static ResourceSchema),
    /// 只有新建表单
    CreateOnly(&'static ResourceSchema),
    /// 分页列表
    Paged(&'static ResourceSchema),
    Reports,
    Profile,
}

impl Screen {
    pub fn view(&self) -> ScreenView {
        match self {
            Screen::Reports => ScreenView::Reports,
            Screen::Profile => ScreenView::Profile,
            Screen::Categories => ScreenView::Manage(&resources::CATEGORIES),
            Screen::Patients => ScreenView::Manage(&resources::PATIENTS),
            Screen::RegisterPatient => ScreenView::CreateOnly(&resources::PATIENTS),
            Screen::Stocks => ScreenView::Manage(&resources::STOCKS),
            Screen::AddStock => ScreenView::CreateOnly(&resources::STOCKS),
            Screen::Prescriptions => ScreenView::Paged(&resources::PRESCRIPTIONS),
            Screen::NewPrescription => ScreenView::CreateOnly(&resources::PRESCRIPTIONS),
            Screen::DailyPharmacyExpenses => {
                ScreenView::Manage(&resources::DAILY_PHARMACY_EXPENSES)
            }
            Screen::TakenExpenses => ScreenView::Manage(&resources::TAKEN_EXPENSES),
            Screen::Staff => ScreenView::Manage(&resources::STAFF),
            Screen::TestTypes => ScreenView::Manage(&resources::TEST_TYPES),
            Screen::Lab => ScreenView::Manage(&resources::LAB),
            Screen::Users => ScreenView::Manage(&resources::USERS),
            Screen::Receptions => ScreenView::Manage(&resources::RECEPTIONS),
            Screen::ReceptionCategories => ScreenView::Manage(&resources::RECEPTION_CATEGORIES),
            Screen::BlogCategories => ScreenView::Manage(&resources::BLOG_CATEGORIES),
            Screen::BlogPosts => ScreenView::Manage(&resources::BLOG_POSTS),
            Screen::Slider => ScreenView::Manage(&resources::SLIDER_IMAGES),
            Screen::Services => ScreenView::Manage(&resources::SERVICES),
            Screen::DesignCategories => ScreenView::Manage(&resources::DESIGN_CATEGORIES),
            Screen::AttributeChoices => ScreenView::Manage(&resources::ATTRIBUTE_CHOICES),
            Screen::Attributes => ScreenView::Manage(&resources::ATTRIBUTE_TYPES),
            Screen::AttributeValues => ScreenView::Manage(&resources::ATTRIBUTE_VALUES),
            Screen::RegularStaff => ScreenView::Manage(&resources::REGULAR_STAFF),
        }
    }
}

// =========================================================
// 菜单
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MenuKey {
    Dashboard,
    Categories,
    Patients,
    Pharmacy,
    Expenses,
    Staff,
    Laboratory,
    Reception,
    Website,
    Design,
    Users,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMenuEntry {
    pub label: &'static str,
    pub screen: Screen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: MenuKey,
    pub label: &'static str,
    pub icon: &'static str,
    pub screen: Option<Screen>,
    pub sub_menu: &'static [SubMenuEntry],
    /// 允许的角色；为空表示所有人可见
    pub roles: &'static [Role],
}

impl MenuEntry {
    pub fn permits(&self, role: Option<Role>) -> bool {
        self.roles.is_empty() || role.is_some_and(|r| self.roles.contains(&r))
    }

    pub fn has_children(&self) -> bool {
        !self.sub_menu.is_empty()
    }
}

const ADMIN_RECEPTION: &[Role] = &[Role::ADMIN, Role::RECEPTION];
const ADMIN_DESIGNER: &[Role] = &[Role::ADMIN, Role::DESIGNER];
const ADMIN_ONLY: &[Role] = &[Role::ADMIN];

pub static MENU: [MenuEntry; 12] = [
    MenuEntry {
        key: MenuKey::Dashboard,
        label: "داشبورد",
        icon: "home",
        screen: Some(Screen::Reports),
        sub_menu: &[],
        roles: &[],
    },
    MenuEntry {
        key: MenuKey::Categories,
        label: "بخش‌ها",
        icon: "layers",
        screen: None,
        sub_menu: &[SubMenuEntry {
            label: "نمایش بخش‌ها",
            screen: Screen::Categories,
        }],
        roles: ADMIN_RECEPTION,
    },
    MenuEntry {
        key: MenuKey::Patients,
        label: "بیماران",
        icon: "users",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "لیست بیماران",
                screen: Screen::Patients,
            },
            SubMenuEntry {
                label: "ثبت بیمار جدید",
                screen: Screen::RegisterPatient,
            },
        ],
        roles: ADMIN_RECEPTION,
    },
    MenuEntry {
        key: MenuKey::Pharmacy,
        label: "داروخانه",
        icon: "pill",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "افزودن دارو",
                screen: Screen::AddStock,
            },
            SubMenuEntry {
                label: "لیست داروها",
                screen: Screen::Stocks,
            },
            SubMenuEntry {
                label: "نسخه‌ها",
                screen: Screen::Prescriptions,
            },
            SubMenuEntry {
                label: "اضافه نسخه جدید",
                screen: Screen::NewPrescription,
            },
        ],
        roles: ADMIN_DESIGNER,
    },
    MenuEntry {
        key: MenuKey::Expenses,
        label: "هزینه‌ها",
        icon: "wallet",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "مصارف روزانه داروخانه",
                screen: Screen::DailyPharmacyExpenses,
            },
            SubMenuEntry {
                label: "پول‌های گرفته شده",
                screen: Screen::TakenExpenses,
            },
        ],
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        key: MenuKey::Staff,
        label: "کارمندان",
        icon: "briefcase",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "مدیریت کارمندان",
                screen: Screen::Staff,
            },
            SubMenuEntry {
                label: "کارمندان عادی",
                screen: Screen::RegularStaff,
            },
        ],
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        key: MenuKey::Laboratory,
        label: "لابراتوار",
        icon: "flask",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "انواع آزمایش",
                screen: Screen::TestTypes,
            },
            SubMenuEntry {
                label: "ثبت آزمایش",
                screen: Screen::Lab,
            },
        ],
        roles: ADMIN_RECEPTION,
    },
    MenuEntry {
        key: MenuKey::Reception,
        label: "پذیرش",
        icon: "inbox",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "سفارش‌ها",
                screen: Screen::Receptions,
            },
            SubMenuEntry {
                label: "دسته‌بندی سفارش‌ها",
                screen: Screen::ReceptionCategories,
            },
        ],
        roles: ADMIN_RECEPTION,
    },
    MenuEntry {
        key: MenuKey::Website,
        label: "وبسایت",
        icon: "globe",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "دسته‌بندی وبلاگ",
                screen: Screen::BlogCategories,
            },
            SubMenuEntry {
                label: "پست‌های وبلاگ",
                screen: Screen::BlogPosts,
            },
            SubMenuEntry {
                label: "اسلایدر",
                screen: Screen::Slider,
            },
            SubMenuEntry {
                label: "خدمات",
                screen: Screen::Services,
            },
        ],
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        key: MenuKey::Design,
        label: "دیزاین",
        icon: "palette",
        screen: None,
        sub_menu: &[
            SubMenuEntry {
                label: "کتگوری‌ها",
                screen: Screen::DesignCategories,
            },
            SubMenuEntry {
                label: "انواع ویژگی",
                screen: Screen::AttributeChoices,
            },
            SubMenuEntry {
                label: "ویژگی‌ها",
                screen: Screen::Attributes,
            },
            SubMenuEntry {
                label: "مقادیر ویژگی",
                screen: Screen::AttributeValues,
            },
        ],
        roles: ADMIN_DESIGNER,
    },
    MenuEntry {
        key: MenuKey::Users,
        label: "کاربران",
        icon: "user-cog",
        screen: None,
        sub_menu: &[SubMenuEntry {
            label: "مدیریت کاربران",
            screen: Screen::Users,
        }],
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        key: MenuKey::Logout,
        label: "خروج",
        icon: "logout",
        screen: None,
        sub_menu: &[],
        roles: &[],
    },
];

pub fn entry(key: MenuKey) -> Option<&'static MenuEntry> {
    MENU.iter().find(|e| e.key == key)
}

/// 菜单是否按角色过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPolicy {
    #[default]
    ShowAll,
    FilterByRole,
}

impl MenuPolicy {
    /// `all` / `role`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(MenuPolicy::ShowAll),
            "role" => Some(MenuPolicy::FilterByRole),
            _ => None,
        }
    }
}

pub fn visible_menu(policy: MenuPolicy, role: Option<Role>) -> Vec<&'static MenuEntry> {
    MENU.iter()
        .filter(|e| match policy {
            MenuPolicy::ShowAll => true,
            MenuPolicy::FilterByRole => e.permits(role),
        })
        .collect()
}

// =========================================================
// 导航状态
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Toggled,
    Navigated(Screen),
    Logout,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    expanded: BTreeSet<MenuKey>,
    pub active: Screen,
    pub highlighted: Option<&'static str>,
    pub sidebar_open: bool,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::new(),
            active: Screen::default(),
            highlighted: None,
            sidebar_open: true,
        }
    }
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: MenuKey) -> bool {
        self.expanded.contains(&key)
    }

    /// 点击一级菜单
    pub fn click(&mut self, key: MenuKey) -> NavAction {
        if key == MenuKey::Logout {
            return NavAction::Logout;
        }
        let Some(entry) = entry(key) else {
            return NavAction::Ignored;
        };

        if entry.has_children() {
            if !self.expanded.remove(&key) {
                self.expanded.insert(key);
            }
            return NavAction::Toggled;
        }

        match entry.screen {
            Some(screen) => {
                self.active = screen;
                self.highlighted = Some(entry.label);
                NavAction::Navigated(screen)
            }
            None => NavAction::Ignored,
        }
    }

    /// 点击二级菜单
    pub fn click_sub(&mut self, key: MenuKey, screen: Screen) -> NavAction {
        let sub = entry(key)
            .into_iter()
            .flat_map(|e| e.sub_menu.iter())
            .find(|s| s.screen == screen);
        match sub {
            Some(sub) => {
                self.active = sub.screen;
                self.highlighted = Some(sub.label);
                NavAction::Navigated(sub.screen)
            }
            None => NavAction::Ignored,
        }
    }

    /// 顶栏入口（个人资料）直接切换屏幕
    pub fn open(&mut self, screen: Screen) {
        self.active = screen;
        self.highlighted = None;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_screen_is_reports() {
        let nav = NavState::new();
        assert_eq!(nav.active, Screen::Reports);
        assert_eq!(nav.active.view(), ScreenView::Reports);
    }

    #[test]
    fn test_click_parent_toggles_expansion() {
        let mut nav = NavState::new();
        assert_eq!(nav.click(MenuKey::Patients), NavAction::Toggled);
        assert!(nav.is_expanded(MenuKey::Patients));
        assert_eq!(nav.click(MenuKey::Patients), NavAction::Toggled);
        assert!(!nav.is_expanded(MenuKey::Patients));
        assert_eq!(nav.active, Screen::Reports);
    }

    #[test]
    fn test_click_sub_sets_active_and_highlight() {
        let mut nav = NavState::new();
        let action = nav.click_sub(MenuKey::Patients, Screen::RegisterPatient);
        assert_eq!(action, NavAction::Navigated(Screen::RegisterPatient));
        assert_eq!(nav.highlighted, Some("ثبت بیمار جدید"));
        assert!(matches!(nav.active.view(), ScreenView::CreateOnly(s) if s.key == "patients"));
    }

    #[test]
    fn test_click_sub_rejects_foreign_screen() {
        let mut nav = NavState::new();
        assert_eq!(nav.click_sub(MenuKey::Staff, Screen::Users), NavAction::Ignored);
        assert_eq!(nav.active, Screen::Reports);
    }

    #[test]
    fn test_logout_entry_signals_logout() {
        let mut nav = NavState::new();
        assert_eq!(nav.click(MenuKey::Logout), NavAction::Logout);
    }

    #[test]
    fn test_show_all_ignores_role() {
        assert_eq!(visible_menu(MenuPolicy::ShowAll, None).len(), MENU.len());
        assert_eq!(
            visible_menu(MenuPolicy::ShowAll, Some(Role::RECEPTION)).len(),
            MENU.len()
        );
    }

    #[test]
    fn test_reception_role_filter() {
        let keys: Vec<MenuKey> = visible_menu(MenuPolicy::FilterByRole, Some(Role::RECEPTION))
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                MenuKey::Dashboard,
                MenuKey::Categories,
                MenuKey::Patients,
                MenuKey::Laboratory,
                MenuKey::Reception,
                MenuKey::Logout
            ]
        );
    }

    #[test]
    fn test_unknown_role_sees_only_shared_entries() {
        let keys: Vec<MenuKey> = visible_menu(MenuPolicy::FilterByRole, None)
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec![MenuKey::Dashboard, MenuKey::Logout]);
    }

    #[test]
    fn test_designer_role_sees_pharmacy_and_design() {
        let keys: Vec<MenuKey> = visible_menu(MenuPolicy::FilterByRole, Some(Role::DESIGNER))
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(
            keys,
            vec![MenuKey::Dashboard, MenuKey::Pharmacy, MenuKey::Design, MenuKey::Logout]
        );
    }

    #[test]
    fn test_regular_staff_is_a_read_only_list() {
        let mut nav = NavState::new();
        let action = nav.click_sub(MenuKey::Staff, Screen::RegularStaff);
        assert_eq!(action, NavAction::Navigated(Screen::RegularStaff));
        assert_eq!(nav.highlighted, Some("کارمندان عادی"));
        assert!(matches!(
            nav.active.view(),
            ScreenView::Manage(s) if s.key == "regular_staff" && !s.capabilities.create
        ));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(MenuPolicy::parse("ROLE"), Some(MenuPolicy::FilterByRole));
        assert_eq!(MenuPolicy::parse("all"), Some(MenuPolicy::ShowAll));
        assert_eq!(MenuPolicy::parse("x"), None);
    }
}
