//! IPT Portal entry point
//!
//! On the web: binds the portal to the DOM, LocalStorage and `hashchange`.
//! Natively: a line-driven console over in-memory storage.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, EventTarget, HtmlFormElement, HtmlInputElement};

    use ipt_portal::platform::LocalStorage;
    use ipt_portal::router::{Navigator, Notifier, PageHost, Route, Router, Severity};
    use ipt_portal::{Config, Portal, RegisterForm, Session};

    // Bootstrap's toast component lives on the JS side
    #[wasm_bindgen(inline_js = "
        export function show_toast() {
            const el = document.getElementById('toast');
            if (el && window.bootstrap) {
                new window.bootstrap.Toast(el).show();
            }
        }
    ")]
    extern "C" {
        fn show_toast();
    }

    /// Shell backed by the page's DOM
    struct DomShell {
        document: Document,
        location: web_sys::Location,
    }

    impl DomShell {
        fn hash(&self) -> String {
            self.location.hash().unwrap_or_default()
        }
    }

    impl Navigator for DomShell {
        fn set_location(&mut self, route: Route) {
            if let Err(e) = self.location.set_hash(&route.fragment()) {
                log::warn!("Failed to set location: {:?}", e);
            }
        }
    }

    impl PageHost for DomShell {
        fn deactivate_all(&mut self) {
            let Ok(pages) = self.document.query_selector_all(".page") else {
                return;
            };
            for i in 0..pages.length() {
                if let Some(page) = pages.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    let _ = page.class_list().remove_1("active");
                }
            }
        }

        fn activate(&mut self, page: Route) {
            match self.document.get_element_by_id(&page.page_id()) {
                Some(el) => {
                    let _ = el.class_list().add_1("active");
                }
                None => log::warn!("No element #{}", page.page_id()),
            }
        }
    }

    impl Notifier for DomShell {
        fn notify(&mut self, message: &str, severity: Severity) {
            if let Some(body) = self.document.get_element_by_id("toast-message") {
                body.set_text_content(Some(message));
            }
            if let Some(toast) = self.document.get_element_by_id("toast") {
                toast.set_class_name(&format!("toast bg-{} text-white", severity.as_str()));
            }
            show_toast();
        }
    }

    /// Portal plus its shell, shared by every event handler
    struct App {
        portal: Portal<LocalStorage>,
        shell: DomShell,
    }

    impl App {
        fn route(&mut self) {
            let hash = self.shell.hash();
            self.portal.handle_location(&hash, &mut self.shell);
        }

        /// Reflect the session in body classes and the navbar.
        fn refresh_auth_ui(&self) {
            let document = &self.shell.document;
            let Some(body) = document.body() else {
                return;
            };
            let classes = body.class_list();
            match self.portal.session() {
                Session::Authenticated(account) => {
                    let _ = classes.remove_1("not-authenticated");
                    let _ = classes.add_1("authenticated");
                    let _ = classes.toggle_with_force("is-admin", account.is_admin());
                    if let Some(el) = document.get_element_by_id("username-display") {
                        el.set_text_content(Some(&account.first_name));
                    }
                }
                Session::Anonymous => {
                    let _ = classes.remove_2("authenticated", "is-admin");
                    let _ = classes.add_1("not-authenticated");
                }
            }
        }
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    fn set_html(document: &Document, id: &str, html: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_inner_html(html);
        }
    }

    fn placeholder(document: &Document, id: &str, what: &str) {
        set_html(
            document,
            id,
            &format!("<p class=\"text-muted\">{} is not available yet</p>", what),
        );
    }

    fn register_render_hooks(router: &mut Router, document: &Document) {
        {
            let document = document.clone();
            router.register(Route::Profile, move |ctx| {
                let Some(user) = ctx.current() else {
                    return;
                };
                let badge = if user.is_admin() { "danger" } else { "primary" };
                let html = format!(
                    "<div class=\"row\"><div class=\"col-md-6\">\
                     <p><strong>First Name:</strong> {}</p>\
                     <p><strong>Last Name:</strong> {}</p>\
                     <p><strong>Email:</strong> {}</p>\
                     <p><strong>Role:</strong> <span class=\"badge bg-{}\">{}</span></p>\
                     <p><strong>Account Created:</strong> {}</p>\
                     </div></div>",
                    escape_html(&user.first_name),
                    escape_html(&user.last_name),
                    escape_html(&user.email),
                    badge,
                    user.role.as_str(),
                    user.created_at.format("%Y-%m-%d"),
                );
                set_html(&document, "profile-content", &html);
            });
        }
        {
            let document = document.clone();
            router.register(Route::VerifyEmail, move |ctx| match &ctx.pending_email {
                Some(email) => {
                    if let Some(el) = document.get_element_by_id("verify-email-display") {
                        el.set_text_content(Some(email));
                    }
                }
                None => ctx.redirect(Route::Home),
            });
        }
        for (route, container, what) in [
            (Route::Accounts, "accounts-table-container", "Accounts management"),
            (Route::Employees, "employees-table-container", "Employees management"),
            (Route::Departments, "departments-table-container", "Departments management"),
            (Route::Requests, "requests-table-container", "Requests"),
        ] {
            let document = document.clone();
            router.register(route, move |_ctx| placeholder(&document, container, what));
        }
    }

    fn input_value(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn reset_form(document: &Document, id: &str) {
        if let Some(form) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
        {
            form.reset();
        }
    }

    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn listen_by_id(
        document: &Document,
        id: &str,
        event: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        match document.get_element_by_id(id) {
            Some(el) => listen(&el, event, handler),
            None => log::debug!("No #{} on this page", id),
        }
    }

    fn setup_event_listeners(window: &web_sys::Window, document: &Document, app: Rc<RefCell<App>>) {
        // Navigation: back/forward, typed URLs and every set_location
        {
            let app = app.clone();
            listen(window, "hashchange", move |_event| app.borrow_mut().route());
        }

        {
            let app = app.clone();
            let doc = document.clone();
            listen_by_id(document, "register-form", "submit", move |event| {
                event.prevent_default();
                let form = RegisterForm {
                    first_name: input_value(&doc, "reg-firstname"),
                    last_name: input_value(&doc, "reg-lastname"),
                    email: input_value(&doc, "reg-email"),
                    password: input_value(&doc, "reg-password"),
                };
                let mut app = app.borrow_mut();
                let App { portal, shell } = &mut *app;
                if portal.register(&form, shell).is_ok() {
                    reset_form(&doc, "register-form");
                }
            });
        }

        {
            let app = app.clone();
            let doc = document.clone();
            listen_by_id(document, "login-form", "submit", move |event| {
                event.prevent_default();
                let email = input_value(&doc, "login-email");
                let password = input_value(&doc, "login-password");
                let mut app = app.borrow_mut();
                let App { portal, shell } = &mut *app;
                if portal.login(&email, &password, shell).is_ok() {
                    reset_form(&doc, "login-form");
                    app.refresh_auth_ui();
                }
            });
        }

        {
            let app = app.clone();
            listen_by_id(document, "logout-btn", "click", move |event| {
                event.prevent_default();
                let mut app = app.borrow_mut();
                let App { portal, shell } = &mut *app;
                portal.logout(shell);
                app.refresh_auth_ui();
            });
        }

        listen_by_id(document, "simulate-verify-btn", "click", move |_event| {
            let mut app = app.borrow_mut();
            let App { portal, shell } = &mut *app;
            let _ = portal.verify_email(shell);
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();

        let storage = LocalStorage::open();
        let config = Config::load(&storage);
        console_log::init_with_level(config.log_level.to_level()).expect("Failed to init logger");

        log::info!("Initializing app...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let mut portal = Portal::new(storage, &config);
        register_render_hooks(portal.router_mut(), &document);

        let shell = DomShell {
            document: document.clone(),
            location: window.location(),
        };
        let app = Rc::new(RefCell::new(App { portal, shell }));

        {
            let mut guard = app.borrow_mut();
            guard.refresh_auth_ui();
            let App { portal, shell } = &mut *guard;
            let hash = shell.hash();
            portal.start(&hash, shell);
        }

        setup_event_listeners(&window, &document, app);

        log::info!("App initialized!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use std::io::{self, BufRead, Write};

    use ipt_portal::router::{MemoryShell, Navigation, Route};
    use ipt_portal::{Config, MemoryStorage, Portal, RegisterForm};

    const HELP: &str = "\
commands:
  go <route>                        navigate (home, login, profile, accounts, ...)
  register <first> <last> <email> <password>
  verify                            simulate clicking the verification link
  login <email> <password>
  logout
  whoami
  loglevel <level>                  error, warn, info, debug or trace (saved)
  reload                            restart over the same storage
  quit";

    fn new_portal(storage: MemoryStorage, config: &Config) -> Portal<MemoryStorage> {
        let mut portal = Portal::new(storage, config);
        let router = portal.router_mut();
        router.register(Route::Profile, |ctx| {
            if let Some(user) = ctx.current() {
                println!(
                    "  {} <{}> role={} created={}",
                    user.full_name(),
                    user.email,
                    user.role.as_str(),
                    user.created_at.format("%Y-%m-%d")
                );
            }
        });
        router.register(Route::Accounts, |ctx| {
            for account in &ctx.database.accounts {
                println!(
                    "  #{} {} <{}> {} {}",
                    account.id,
                    account.full_name(),
                    account.email,
                    account.role.as_str(),
                    if account.verified { "verified" } else { "unverified" }
                );
            }
        });
        router.register(Route::Departments, |ctx| {
            for department in &ctx.database.departments {
                println!("  #{} {}: {}", department.id, department.name, department.description);
            }
        });
        router.register(Route::VerifyEmail, |ctx| match &ctx.pending_email {
            Some(email) => println!("  verification sent to {}", email),
            None => ctx.redirect(Route::Home),
        });
        portal
    }

    /// Route location changes until the shell stops moving.
    fn settle(portal: &mut Portal<MemoryStorage>, shell: &mut MemoryShell) {
        for _ in 0..8 {
            let Some(fragment) = shell.take_location_change() else {
                break;
            };
            match portal.handle_location(&fragment, shell) {
                Navigation::Activated(route) => println!("[page] {}", route.name()),
                Navigation::Redirected { to, reason } => {
                    println!("[redirect] {} ({:?})", to.name(), reason)
                }
            }
        }
        for notice in shell.take_notices() {
            println!("[{}] {}", notice.severity.as_str(), notice.message);
        }
    }

    fn to_fragment(target: &str) -> String {
        if target.starts_with('#') {
            target.to_string()
        } else {
            format!("#/{}", target.trim_start_matches('/'))
        }
    }

    pub fn run(storage: MemoryStorage, mut config: Config) -> io::Result<()> {
        let mut portal = new_portal(storage, &config);
        let mut shell = MemoryShell::new();
        portal.start("", &mut shell);
        settle(&mut portal, &mut shell);
        println!("{}", HELP);

        let stdin = io::stdin();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let args: Vec<&str> = line.split_whitespace().collect();
            match args.as_slice() {
                [] => continue,
                ["go", target] => shell.visit(&to_fragment(target)),
                ["register", first, last, email, password] => {
                    let form = RegisterForm {
                        first_name: first.to_string(),
                        last_name: last.to_string(),
                        email: email.to_string(),
                        password: password.to_string(),
                    };
                    let _ = portal.register(&form, &mut shell);
                }
                ["verify"] => {
                    let _ = portal.verify_email(&mut shell);
                }
                ["login", email, password] => {
                    let _ = portal.login(email, password, &mut shell);
                }
                ["logout"] => portal.logout(&mut shell),
                ["whoami"] => match portal.sessions().current() {
                    Some(user) => println!("{} ({})", user.email, user.role.as_str()),
                    None => println!("anonymous"),
                },
                ["loglevel", level] => {
                    if config.apply_log_level(level) {
                        log::set_max_level(config.log_level.to_level_filter());
                        config.save(portal.sessions_mut().store_mut().backend_mut());
                        println!("log level {}", config.log_level.as_str());
                    } else {
                        println!("unknown log level {}", level);
                    }
                }
                ["reload"] => {
                    let storage = portal.sessions().store().backend().clone();
                    config = Config::load(&storage);
                    portal = new_portal(storage, &config);
                    let location = shell.location().to_string();
                    shell = MemoryShell::at(&location);
                    portal.start(&location, &mut shell);
                    println!("[reloaded at {}]", location);
                }
                ["quit"] | ["exit"] => break,
                _ => println!("{}", HELP),
            }
            settle(&mut portal, &mut shell);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    let storage = ipt_portal::MemoryStorage::new();
    let mut config = ipt_portal::Config::load(&storage);
    if let Ok(level) = std::env::var("IPT_LOG_LEVEL") {
        config.apply_log_level(&level);
    }
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str().to_lowercase()),
    )
    .init();
    log::info!("IPT Portal (native) starting...");

    console::run(storage, config)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
