#![forbid(unsafe_code)]

//! Simulated UI components.
//!
//! A component initializes once, renders to a string, and may ask to be
//! rendered again through its [`RenderTracker`]. The tracker's callback is
//! what a component hands to the store as its re-render listener.
//!
//! - [`HomePage`] subscribes to `first_name` and, after its first render,
//!   mounts the weather panel.
//! - [`WeatherPanel`] writes the customer's name during initialization.

use std::cell::Cell;
use std::rc::Rc;

use obstate_core::{StateError, StateModel, Subscription};
use tracing::{debug, info};

use crate::store::CustomerState;

/// Re-render requests for one component.
#[derive(Debug, Clone, Default)]
pub struct RenderTracker {
    pending: Rc<Cell<u32>>,
    total: Rc<Cell<u32>>,
}

impl RenderTracker {
    /// Create a tracker with no requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for another render.
    pub fn request(&self) {
        self.pending.set(self.pending.get() + 1);
        self.total.set(self.total.get() + 1);
    }

    /// Listener that requests a render when invoked.
    pub fn callback(&self) -> impl Fn() + 'static {
        let tracker = self.clone();
        move || tracker.request()
    }

    /// Take and reset the number of outstanding requests.
    pub fn take_pending(&self) -> u32 {
        self.pending.replace(0)
    }

    /// Requests made over the tracker's lifetime.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total.get()
    }
}

/// Lifecycle shared by the simulated components.
pub trait Component {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Called once before the first render.
    fn on_initialized(&mut self) -> Result<(), StateError> {
        Ok(())
    }

    /// Produce the component's output. May mount children.
    fn render(&mut self) -> Result<String, StateError>;

    /// Called after every render.
    fn on_after_render(&mut self, _first_render: bool) {}
}

/// Landing page. Re-renders whenever the customer's first name changes.
pub struct HomePage {
    customer: Rc<CustomerState>,
    tracker: RenderTracker,
    show_weather: bool,
    weather: Option<WeatherPanel>,
    weather_name: (String, String),
    subscription: Option<Subscription>,
    renders: u32,
}

impl HomePage {
    /// Create the page. The weather panel it mounts later writes
    /// `first_name` and `last_name`.
    #[must_use]
    pub fn new(
        customer: Rc<CustomerState>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            customer,
            tracker: RenderTracker::new(),
            show_weather: false,
            weather: None,
            weather_name: (first_name.into(), last_name.into()),
            subscription: None,
            renders: 0,
        }
    }

    /// The page's render tracker.
    #[must_use]
    pub fn tracker(&self) -> &RenderTracker {
        &self.tracker
    }

    /// Renders performed so far.
    #[must_use]
    pub fn renders(&self) -> u32 {
        self.renders
    }

    /// Whether the weather panel has been mounted.
    #[must_use]
    pub fn weather_mounted(&self) -> bool {
        self.weather.is_some()
    }

    /// Drop the page's listener, as a component does when it is disposed.
    pub fn dispose(&mut self) -> bool {
        self.subscription
            .take()
            .is_some_and(Subscription::unsubscribe)
    }
}

impl Component for HomePage {
    fn name(&self) -> &'static str {
        "home"
    }

    fn on_initialized(&mut self) -> Result<(), StateError> {
        let sub = self
            .customer
            .subscribe_to_property_change(CustomerState::FIRST_NAME, self.tracker.callback())?;
        debug!(component = self.name(), id = %sub.id(), "subscribed to first_name");
        self.subscription = Some(sub);
        Ok(())
    }

    fn render(&mut self) -> Result<String, StateError> {
        self.renders += 1;

        if self.show_weather && self.weather.is_none() {
            let (first, last) = self.weather_name.clone();
            let mut panel = WeatherPanel::new(Rc::clone(&self.customer), first, last);
            panel.on_initialized()?;
            self.weather = Some(panel);
        }

        let mut out = format!("Hello, {}!", greeting_name(&self.customer));
        if let Some(panel) = self.weather.as_mut() {
            out.push('\n');
            out.push_str(&panel.render()?);
            panel.on_after_render(false);
        }
        Ok(out)
    }

    fn on_after_render(&mut self, first_render: bool) {
        if first_render {
            self.show_weather = true;
            self.tracker.request();
        }
    }
}

fn greeting_name(customer: &CustomerState) -> String {
    let name = customer.display_name();
    if name.is_empty() {
        "world".to_string()
    } else {
        name
    }
}

/// One day of the sample forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forecast {
    /// Days from today.
    pub day: u8,
    /// Temperature in Celsius.
    pub temperature_c: i32,
    /// Short description.
    pub summary: &'static str,
}

impl Forecast {
    /// Temperature in Fahrenheit, rounded to the nearest degree.
    #[must_use]
    pub fn temperature_f(&self) -> i32 {
        (32.0 + f64::from(self.temperature_c) * 9.0 / 5.0).round() as i32
    }
}

const FORECAST: [Forecast; 3] = [
    Forecast {
        day: 1,
        temperature_c: 18,
        summary: "Mild",
    },
    Forecast {
        day: 2,
        temperature_c: 25,
        summary: "Warm",
    },
    Forecast {
        day: 3,
        temperature_c: -2,
        summary: "Freezing",
    },
];

/// Weather panel. Writes the customer's name when it initializes.
pub struct WeatherPanel {
    customer: Rc<CustomerState>,
    first_name: String,
    last_name: String,
}

impl WeatherPanel {
    /// Create a panel that will set the given name on initialization.
    #[must_use]
    pub fn new(
        customer: Rc<CustomerState>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            customer,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Component for WeatherPanel {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn on_initialized(&mut self) -> Result<(), StateError> {
        let first_changed = self.customer.set_first_name(self.first_name.clone());
        let last_changed = self.customer.set_last_name(self.last_name.clone());
        info!(
            component = self.name(),
            first_changed, last_changed, "customer name written"
        );
        Ok(())
    }

    fn render(&mut self) -> Result<String, StateError> {
        let rows: Vec<String> = FORECAST
            .iter()
            .map(|f| {
                format!(
                    "  +{}d  {:>3}C {:>3}F  {}",
                    f.day,
                    f.temperature_c,
                    f.temperature_f(),
                    f.summary
                )
            })
            .collect();
        Ok(format!(
            "Weather for {}:\n{}",
            self.customer.display_name(),
            rows.join("\n")
        ))
    }
}
