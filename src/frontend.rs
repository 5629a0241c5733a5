use std::rc::Rc;

use js_sys::Array;
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlAnchorElement,
    HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, NodeList, ScrollBehavior,
    ScrollToOptions, VisibilityState, Window,
};

use crate::{
    config::Settings,
    contact::{
        field_has_error, ContactController, ContactSubmission, FormReset, MailHandoff,
        ERROR_BORDER_COLOR, ERROR_CLASS,
    },
    error::{FieldName, HandoffError},
    logging::Logger,
    navigation::{
        active_probe, active_section, fragment_target, hamburger_line_style, navbar_scrolled,
        scroll_target, MenuState, SectionSpan, ACTIVE_CLASS, SCROLLED_CLASS,
    },
    notification::{
        Notification, NotificationCenter, NotificationKind, Notify, ToastSurface, EXIT_ANIMATION,
        NOTIFICATION_STYLES, STYLE_ELEMENT_ID,
    },
    reveal::{
        reveal_in_view, Revealable, ANIMATION_GROUPS, OBSERVER_ROOT_MARGIN, OBSERVER_THRESHOLD,
        PENDING_SELECTOR, REVEALED_CLASS, TAGGED_SELECTOR,
    },
    schedule::{BrowserScheduler, Debouncer, Scheduler},
    skills::{parse_progress, ProgressBar, SkillBarAnimator, PROGRESS_ATTRIBUTE},
    theme::{Theme, ThemeState, THEME_ATTRIBUTE},
};

const RESUME_MESSAGE: &str = "Resume download feature would be available in production!";
const FALLBACK_VIEWPORT_HEIGHT: f64 = 720.0;
const CLOSE_CLASS: &str = "notification-close";
const CLOSE_SELECTOR: &str = ".notification-close";

type Notifications = NotificationCenter<BrowserScheduler, DomToastSurface>;

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> bool {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let attached = target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok();
    if attached {
        // Listeners live as long as the page.
        closure.forget();
    }
    attached
}

fn collect_elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn viewport_height(win: &Window) -> f64 {
    win.inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_HEIGHT)
}

fn prefers_reduced_motion(win: &Window) -> bool {
    win.match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        let _ = element.style().set_property(property, value);
    }
}

fn field_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

impl Revealable for Element {
    fn viewport_top(&self) -> f64 {
        self.get_bounding_client_rect().top()
    }

    fn is_revealed(&self) -> bool {
        self.class_list().contains(REVEALED_CLASS)
    }

    fn reveal(&self) {
        let _ = self.class_list().add_1(REVEALED_CLASS);
    }
}

impl ProgressBar for HtmlElement {
    fn fill_to(&self, percent: f64) {
        let _ = self.style().set_property("width", &format!("{percent}%"));
    }
}

struct DomToastSurface {
    document: Document,
}

impl ToastSurface for DomToastSurface {
    type Handle = Element;

    fn inject_styles(&self) {
        if let Some(body) = self.document.body() {
            // One delegated listener serves every toast's close button.
            listen(&body, "click", |event| {
                let toast = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|target| target.closest(CLOSE_SELECTOR).ok().flatten())
                    .and_then(|close| close.closest(".notification").ok().flatten());
                if let Some(toast) = toast {
                    toast.remove();
                }
            });
        }

        if self.document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
            return;
        }
        let Some(head) = self.document.head() else {
            return;
        };
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        style.set_id(STYLE_ELEMENT_ID);
        style.set_text_content(Some(NOTIFICATION_STYLES));
        let _ = head.append_child(&style);
    }

    fn mount(&self, notification: &Notification) -> Option<Element> {
        let body = self.document.body()?;
        let root = self.document.create_element("div").ok()?;
        root.set_class_name(&notification.kind.class_name());
        let _ = root.set_attribute("role", "status");

        let content = self.document.create_element("div").ok()?;
        content.set_class_name("notification-content");

        let message = self.document.create_element("span").ok()?;
        message.set_class_name("notification-message");
        message.set_text_content(Some(&notification.message));

        let close = self.document.create_element("button").ok()?;
        close.set_class_name(CLOSE_CLASS);
        let _ = close.set_attribute("type", "button");
        let _ = close.set_attribute("aria-label", "Close notification");
        let icon = self.document.create_element("i").ok()?;
        icon.set_class_name("fas fa-times");
        close.append_child(&icon).ok()?;

        content.append_child(&message).ok()?;
        content.append_child(&close).ok()?;
        root.append_child(&content).ok()?;

        body.append_child(&root).ok()?;
        Some(root)
    }

    fn is_mounted(&self, handle: &Element) -> bool {
        handle.parent_element().is_some()
    }

    fn begin_exit(&self, handle: &Element) {
        set_style(handle, "animation", EXIT_ANIMATION);
    }

    fn remove(&self, handle: &Element) {
        handle.remove();
    }

    fn remove_all(&self) {
        for existing in collect_elements(self.document.query_selector_all(".notification")) {
            existing.remove();
        }
    }
}

/// Opens the mail client by clicking a hidden `mailto:` anchor.
struct AnchorMailHandoff {
    document: Document,
}

fn handoff_error(value: JsValue) -> HandoffError {
    HandoffError(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl MailHandoff for AnchorMailHandoff {
    fn open(&self, uri: &str) -> Result<(), HandoffError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| HandoffError("document has no body".to_string()))?;
        let anchor = self
            .document
            .create_element("a")
            .map_err(handoff_error)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| HandoffError("created element is not an anchor".to_string()))?;

        anchor.set_href(uri);
        anchor
            .style()
            .set_property("display", "none")
            .map_err(handoff_error)?;
        body.append_child(&anchor).map_err(handoff_error)?;
        anchor.click();
        body.remove_child(&anchor).map_err(handoff_error)?;
        Ok(())
    }
}

struct DomContactForm {
    form: HtmlFormElement,
}

impl FormReset for DomContactForm {
    fn reset(&self) {
        self.form.reset();
    }
}

struct NavElements {
    navbar: Option<HtmlElement>,
    toggle: Option<Element>,
    menu: Option<Element>,
    links: Vec<Element>,
}

/// Owns all page-session state. Built once; handlers hold `Rc` clones.
struct Portfolio {
    settings: Settings,
    logger: Logger,
    scheduler: BrowserScheduler,
    window: Window,
    document: Document,
    notifications: Rc<Notifications>,
    theme: ThemeState,
    menu: MenuState,
    nav: NavElements,
    skills: SkillBarAnimator<BrowserScheduler, HtmlElement>,
    contact: Option<(HtmlFormElement, ContactController<BrowserScheduler>)>,
}

impl Portfolio {
    fn new(window: Window, document: Document) -> Self {
        let settings = document
            .document_element()
            .map(|root| Settings::from_attributes(|name| root.get_attribute(name)))
            .unwrap_or_default();
        let logger = Logger::new(settings.log_level);
        let scheduler = BrowserScheduler;

        let notifications = Rc::new(NotificationCenter::new(
            scheduler,
            DomToastSurface {
                document: document.clone(),
            },
            &settings,
            logger,
        ));

        let nav = NavElements {
            navbar: document
                .get_element_by_id("navbar")
                .and_then(|navbar| navbar.dyn_into::<HtmlElement>().ok()),
            toggle: document.get_element_by_id("nav-toggle"),
            menu: document.get_element_by_id("nav-menu"),
            links: collect_elements(document.query_selector_all(".nav-link")),
        };

        let bars = collect_elements(document.query_selector_all(".skill-progress"))
            .into_iter()
            .filter_map(|bar| {
                let target = bar
                    .get_attribute(PROGRESS_ATTRIBUTE)
                    .and_then(|value| parse_progress(&value));
                bar.dyn_into::<HtmlElement>().ok().map(|bar| (bar, target))
            })
            .collect();
        let skills = SkillBarAnimator::new(scheduler, bars, settings.skill_bar_stagger_ms);

        let contact = document
            .get_element_by_id("contact-form")
            .and_then(|form| form.dyn_into::<HtmlFormElement>().ok())
            .map(|form| {
                let controller = ContactController::new(
                    scheduler,
                    notifications.clone(),
                    Rc::new(AnchorMailHandoff {
                        document: document.clone(),
                    }),
                    Rc::new(DomContactForm { form: form.clone() }),
                    &settings,
                    logger,
                );
                (form, controller)
            });

        Self {
            settings,
            logger,
            scheduler,
            window,
            document,
            notifications,
            theme: ThemeState::default(),
            menu: MenuState::default(),
            nav,
            skills,
            contact,
        }
    }

    fn notify(&self, message: &str, kind: NotificationKind) {
        self.notifications.notify(message, kind);
    }

    fn log_init(&self, subsystem: &str, attached: bool) {
        self.logger.info(
            "behavior.init",
            json!({ "subsystem": subsystem, "attached": attached }),
        );
    }

    fn log_missing(&self, selector: &str) {
        self.logger.debug("dom.missing", json!({ "selector": selector }));
    }

    fn navbar_height(&self) -> Option<f64> {
        self.nav
            .navbar
            .as_ref()
            .map(|navbar| f64::from(navbar.offset_height()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if prefers_reduced_motion(&self.window) {
            ScrollBehavior::Auto
        } else {
            ScrollBehavior::Smooth
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_to_section(&self, id: &str) -> bool {
        let Some(section) = self.document.get_element_by_id(id) else {
            self.log_missing(&format!("#{id}"));
            return false;
        };

        let page_y_offset = self.window.page_y_offset().unwrap_or(0.0);
        let navbar_height = self
            .navbar_height()
            .unwrap_or(self.settings.navbar_fallback_height_px);
        let top = scroll_target(
            section.get_bounding_client_rect().top(),
            page_y_offset,
            navbar_height,
            self.settings.scroll_margin_px,
        );

        self.smooth_scroll_to(top);
        self.logger.debug("nav.scroll_to", json!({ "target": id, "top": top }));
        true
    }

    fn apply_menu_state(&self, open: bool) {
        if let Some(menu) = &self.nav.menu {
            let _ = menu.class_list().toggle_with_force(ACTIVE_CLASS, open);
        }
        let Some(toggle) = &self.nav.toggle else {
            return;
        };
        let _ = toggle.class_list().toggle_with_force(ACTIVE_CLASS, open);

        for (index, line) in collect_elements(toggle.query_selector_all(".hamburger-line"))
            .iter()
            .enumerate()
        {
            let style = hamburger_line_style(index, open);
            set_style(line, "transform", style.transform);
            set_style(line, "opacity", style.opacity);
        }
    }

    fn close_menu(&self) {
        self.menu.close();
        self.apply_menu_state(false);
    }

    fn update_active_link(&self) {
        let sections: Vec<SectionSpan> =
            collect_elements(self.document.query_selector_all("section[id]"))
                .into_iter()
                .filter_map(|section| {
                    let section = section.dyn_into::<HtmlElement>().ok()?;
                    Some(SectionSpan {
                        id: section.id(),
                        top: f64::from(section.offset_top()),
                        height: f64::from(section.offset_height()),
                    })
                })
                .collect();

        let probe = active_probe(
            self.scroll_y(),
            self.navbar_height(),
            self.settings.active_probe_offset_px,
        );
        let Some(active_id) = active_section(&sections, probe) else {
            return;
        };

        let href = format!("#{active_id}");
        for link in &self.nav.links {
            let _ = link.class_list().remove_1(ACTIVE_CLASS);
        }
        if let Some(link) = self
            .nav
            .links
            .iter()
            .find(|link| link.get_attribute("href").as_deref() == Some(href.as_str()))
        {
            let _ = link.class_list().add_1(ACTIVE_CLASS);
        }
    }

    fn update_navbar_background(&self) {
        if let Some(navbar) = &self.nav.navbar {
            let scrolled =
                navbar_scrolled(self.scroll_y(), self.settings.navbar_scrolled_threshold_px);
            let _ = navbar.class_list().toggle_with_force(SCROLLED_CLASS, scrolled);
        }
    }

    fn reveal_pending(&self) {
        let pending = collect_elements(self.document.query_selector_all(PENDING_SELECTOR));
        let revealed = reveal_in_view(
            &pending,
            viewport_height(&self.window),
            self.settings.reveal_offset_px,
        );
        if revealed > 0 {
            self.logger.debug("reveal.scan", json!({ "revealed": revealed }));
        }
    }

    fn check_skills(&self) {
        let Some(section) = self.document.get_element_by_id("skills") else {
            return;
        };
        let fired = self.skills.check(
            section.get_bounding_client_rect().top(),
            viewport_height(&self.window),
        );
        if fired {
            self.logger
                .info("skills.animated", json!({ "bars": self.skills.len() }));
        }
    }

    fn on_scroll_tick(&self) {
        self.update_active_link();
        self.update_navbar_background();
        self.reveal_pending();
        self.check_skills();
    }

    fn apply_theme(&self, toggle: &Element, theme: Theme) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        }
        self.label_theme_toggle(toggle, theme);
    }

    fn label_theme_toggle(&self, toggle: &Element, theme: Theme) {
        if let Ok(Some(icon)) = toggle.query_selector("i") {
            icon.set_class_name(theme.icon_class());
        }
        let label = theme.toggle_label();
        let _ = toggle.set_attribute("title", &label);
        let _ = toggle.set_attribute("aria-label", &label);
    }
}

fn init_navigation(app: &Rc<Portfolio>) {
    if let Some(toggle) = &app.nav.toggle {
        let handler_app = Rc::clone(app);
        listen(toggle, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            let open = handler_app.menu.toggle();
            handler_app.apply_menu_state(open);
        });
    } else {
        app.log_missing("#nav-toggle");
    }

    for link in &app.nav.links {
        let handler_app = Rc::clone(app);
        let href = link.get_attribute("href");
        listen(link, "click", move |event| {
            handler_app.close_menu();

            let Some(id) = href.as_deref().and_then(fragment_target) else {
                return;
            };
            event.prevent_default();
            if handler_app.scroll_to_section(id) {
                let refresh_app = Rc::clone(&handler_app);
                handler_app
                    .scheduler
                    .defer(handler_app.settings.initial_check_delay_ms, move || {
                        refresh_app.update_active_link();
                    });
            }
        });
    }

    for button in collect_elements(
        app.document
            .query_selector_all("a[href=\"#contact\"]:not(.nav-link)"),
    ) {
        let handler_app = Rc::clone(app);
        listen(&button, "click", move |event| {
            event.prevent_default();
            handler_app.scroll_to_section("contact");
        });
    }

    if let Ok(Some(brand)) = app.document.query_selector(".nav-brand") {
        set_style(&brand, "cursor", "pointer");
        let handler_app = Rc::clone(app);
        listen(&brand, "click", move |event| {
            event.prevent_default();
            handler_app.smooth_scroll_to(0.0);
        });
    }

    let handler_app = Rc::clone(app);
    listen(&app.document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if event.key() == "Escape" && handler_app.menu.is_open() {
            handler_app.close_menu();
        }
    });

    let startup_app = Rc::clone(app);
    app.scheduler
        .defer(app.settings.initial_check_delay_ms, move || {
            startup_app.update_active_link();
        });

    app.log_init("navigation", app.nav.toggle.is_some() || !app.nav.links.is_empty());
}

fn init_theme_toggle(app: &Rc<Portfolio>) {
    let Some(toggle) = app.document.get_element_by_id("theme-toggle") else {
        app.log_missing("#theme-toggle");
        app.log_init("theme", false);
        return;
    };

    app.label_theme_toggle(&toggle, app.theme.current());

    let handler_app = Rc::clone(app);
    let target = toggle.clone();
    let attached = listen(&toggle, "click", move |event| {
        event.prevent_default();
        event.stop_propagation();

        let theme = handler_app.theme.toggle();
        handler_app.apply_theme(&target, theme);
        handler_app
            .logger
            .info("theme.changed", json!({ "theme": theme.as_str() }));
        handler_app.notify(&theme.changed_message(), NotificationKind::Info);
    });
    app.log_init("theme", attached);
}

fn assign_animation_groups(document: &Document) -> usize {
    let mut tagged = 0;
    for group in &ANIMATION_GROUPS {
        let elements = if group.single {
            document
                .query_selector(group.selector)
                .ok()
                .flatten()
                .into_iter()
                .collect()
        } else {
            collect_elements(document.query_selector_all(group.selector))
        };

        for (index, element) in elements.iter().enumerate() {
            let assignment = group.assignment(index);
            let _ = element.class_list().add_1(assignment.effect.class_name());
            if let Some(delay) = &assignment.transition_delay {
                set_style(element, "transition-delay", delay);
            }
            tagged += 1;
        }
    }
    tagged
}

fn observe_tagged_elements(app: &Rc<Portfolio>) -> bool {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let target = entry.target();
                    target.reveal();
                    observer.unobserve(&target);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(OBSERVER_THRESHOLD));
    options.set_root_margin(OBSERVER_ROOT_MARGIN);

    let Ok(observer) =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
    else {
        app.log_missing("IntersectionObserver");
        return false;
    };
    callback.forget();

    for element in collect_elements(app.document.query_selector_all(TAGGED_SELECTOR)) {
        observer.observe(&element);
    }
    true
}

fn init_scroll_animations(app: &Rc<Portfolio>) {
    let tagged = assign_animation_groups(&app.document);
    let observing = observe_tagged_elements(app);
    app.logger.info(
        "behavior.init",
        json!({ "subsystem": "reveal", "attached": tagged > 0, "tagged": tagged, "observer": observing }),
    );

    let startup_app = Rc::clone(app);
    app.scheduler
        .defer(app.settings.initial_check_delay_ms, move || {
            startup_app.reveal_pending();
        });

    let handler_app = Rc::clone(app);
    listen(&app.document, "visibilitychange", move |_| {
        if handler_app.document.visibility_state() != VisibilityState::Visible {
            return;
        }
        let recheck_app = Rc::clone(&handler_app);
        handler_app
            .scheduler
            .defer(handler_app.settings.initial_check_delay_ms, move || {
                recheck_app.reveal_pending();
            });
    });
}

fn init_skill_bars(app: &Rc<Portfolio>) {
    let startup_app = Rc::clone(app);
    app.scheduler
        .defer(app.settings.skill_bar_start_delay_ms, move || {
            startup_app.check_skills();
        });
    app.log_init("skills", !app.skills.is_empty());
}

fn init_scroll_listener(app: &Rc<Portfolio>) {
    let tick_app = Rc::clone(app);
    let debouncer = Debouncer::new(app.scheduler, app.settings.scroll_debounce_ms, move || {
        tick_app.on_scroll_tick();
    });
    listen(&app.window, "scroll", move |_| debouncer.trigger());
}

fn init_contact_form(app: &Rc<Portfolio>) {
    let Some((form, _)) = &app.contact else {
        app.log_missing("#contact-form");
        app.log_init("contact", false);
        return;
    };

    let handler_app = Rc::clone(app);
    let attached = listen(form, "submit", move |event| {
        event.prevent_default();
        let Some((form, controller)) = &handler_app.contact else {
            return;
        };

        let submission = ContactSubmission::from_fields(|field: FieldName| {
            let selector = format!("[name=\"{}\"]", field.as_str());
            form.query_selector(&selector)
                .ok()
                .flatten()
                .and_then(|element| field_value(&element))
        });
        // Rejections are already surfaced as notifications.
        let _ = controller.submit(&submission);
    });

    for field in collect_elements(form.query_selector_all("input, textarea")) {
        let target = field.clone();
        listen(&field, "blur", move |_| {
            let _ = target.class_list().remove_1(ERROR_CLASS);
            let name = target.get_attribute("name").unwrap_or_default();
            let value = field_value(&target).unwrap_or_default();
            if field_has_error(&name, &value) {
                let _ = target.class_list().add_1(ERROR_CLASS);
                set_style(&target, "border-color", ERROR_BORDER_COLOR);
            }
        });

        let target = field.clone();
        listen(&field, "input", move |_| {
            let _ = target.class_list().remove_1(ERROR_CLASS);
            set_style(&target, "border-color", "");
        });
    }

    app.log_init("contact", attached);
}

fn init_resume_button(app: &Rc<Portfolio>) {
    let Some(button) = app.document.get_element_by_id("download-resume") else {
        return;
    };
    let handler_app = Rc::clone(app);
    listen(&button, "click", move |event| {
        event.prevent_default();
        handler_app.notify(RESUME_MESSAGE, NotificationKind::Info);
    });
}

fn init() {
    let Some(win) = window() else {
        return;
    };
    let Some(document) = win.document() else {
        return;
    };

    let app = Rc::new(Portfolio::new(win, document));
    app.logger.debug(
        "behavior.settings",
        serde_json::to_value(&app.settings).unwrap_or_default(),
    );

    init_navigation(&app);
    init_theme_toggle(&app);
    init_scroll_animations(&app);
    init_skill_bars(&app);
    init_contact_form(&app);
    init_resume_button(&app);
    init_scroll_listener(&app);
}

pub fn run() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(init);
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref());
    } else {
        init();
    }
}
