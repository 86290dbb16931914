//! People grid with a moving live highlight.
//!
//! Generated people are drawn as panels (contact details above an address
//! table) in as many columns as the console width allows. One live region
//! holds the whole grid; every step redraws it with the next person's panel
//! highlighted while log lines scroll above it.

use std::thread;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;

use richdemo_console::widgets::{Column, Columns, Group, Panel, Table};
use richdemo_console::{ConsoleConfig, ConsoleResult, Content, DemoConsole, LiveDisplay, Line, Span, StyleSpec};

const TARGET: &str = "rich";

const FIRST_NAMES: [&str; 24] = [
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Lisa", "Matthew", "Nancy",
];
const LAST_NAMES: [&str; 24] = [
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia",
    "Martinez", "Robinson", "Clark", "Rodriguez", "Lewis", "Lee",
];
const OCCUPATIONS: [&str; 20] = [
    "Engineer", "Doctor", "Teacher", "Designer", "Developer", "Scientist", "Writer", "Artist",
    "Lawyer", "Accountant", "Manager", "Chef", "Nurse", "Architect", "Analyst", "Consultant",
    "Researcher", "Therapist", "Technician", "Specialist",
];
const DOMAINS: [&str; 6] = [
    "gmail.com", "yahoo.com", "outlook.com", "hotmail.com", "example.com", "company.com",
];
const STREETS: [&str; 12] = [
    "Main St", "Oak Ave", "Maple Rd", "Washington Blvd", "Park Lane", "Broadway", "First Ave",
    "Second St", "Highland Dr", "Lake View Rd", "Forest Ave", "Cedar St",
];
const CITIES: [&str; 12] = [
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "San Jose", "Austin", "Boston",
];
const STATES: [&str; 12] = ["NY", "CA", "IL", "TX", "AZ", "PA", "FL", "OH", "GA", "NC", "WA", "CO"];
const ADDRESS_TYPES: [&str; 5] = ["Home", "Work", "Other", "Vacation", "Business"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub kind: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone: String,
    pub occupation: String,
    pub addresses: Vec<Address>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let birthday_pending = (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day());
        today.year() - self.birth_date.year() - i32::from(birthday_pending)
    }

    fn info(&self, today: NaiveDate) -> Content {
        let field = |label: &str, value: String| {
            Line::from_spans(vec![
                Span::styled(format!("{label}: "), "bold"),
                Span::styled(value, "cyan"),
            ])
        };
        let mut info = Content::new();
        info.push(field("Name", self.full_name()));
        info.push(field("Age", self.age_on(today).to_string()));
        info.push(field("Birth Date", self.birth_date.format("%B %d, %Y").to_string()));
        info.push(field("Email", self.email.clone()));
        info.push(field("Phone", self.phone.clone()));
        if !self.occupation.is_empty() {
            info.push(field("Occupation", self.occupation.clone()));
        }
        info
    }

    fn address_table(&self) -> Table {
        let mut table = Table::new()
            .title("Addresses")
            .header_style("bold magenta")
            .column(Column::new("Type").style("dim"))
            .column(Column::new("Street"))
            .column(Column::new("City"))
            .column(Column::new("State"))
            .column(Column::new("Zip"))
            .column(Column::new("Country"));
        for addr in &self.addresses {
            table.add_row_cells([
                addr.kind.as_str(),
                addr.street.as_str(),
                addr.city.as_str(),
                addr.state.as_str(),
                addr.zip.as_str(),
                addr.country.as_str(),
            ]);
        }
        table
    }

    /// Contact details and addresses in a panel bordered with `border`.
    pub fn panel(&self, border: &StyleSpec, today: NaiveDate) -> Panel {
        let body = Group::new()
            .with(self.info(today))
            .with(self.address_table())
            .spacing(1);
        Panel::new(body)
            .title(Line::styled(self.full_name(), StyleSpec::new("bold").with(border)))
            .border_style(border.clone())
            .padding(1, 2)
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&str]) -> String {
    items.choose(rng).copied().unwrap_or_default().to_string()
}

/// `count` random people with one to three addresses each.
pub fn generate_people<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Person> {
    (0..count)
        .map(|_| {
            let first_name = pick(rng, &FIRST_NAMES);
            let last_name = pick(rng, &LAST_NAMES);
            let birth_date = NaiveDate::from_ymd_opt(
                rng.random_range(1960..=2000),
                rng.random_range(1..=12),
                rng.random_range(1..=28),
            )
            .unwrap_or_default();
            let email = format!(
                "{}.{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                pick(rng, &DOMAINS)
            );
            let phone = format!(
                "555-{}-{}",
                rng.random_range(100..=999),
                rng.random_range(1000..=9999)
            );
            let occupation = pick(rng, &OCCUPATIONS);
            let addresses = (0..rng.random_range(1..=3))
                .map(|_| Address {
                    kind: pick(rng, &ADDRESS_TYPES),
                    street: format!("{} {}", rng.random_range(1..=9999), pick(rng, &STREETS)),
                    city: pick(rng, &CITIES),
                    state: pick(rng, &STATES),
                    zip: rng.random_range(10000..=99999).to_string(),
                    country: "USA".to_string(),
                })
                .collect();
            Person {
                first_name,
                last_name,
                birth_date,
                email,
                phone,
                occupation,
                addresses,
            }
        })
        .collect()
}

/// Number of grid columns for a console `width`.
pub fn columns_for(width: usize, min_width: usize) -> usize {
    (width / min_width.max(1)).max(1)
}

/// People laid out as panels, one optionally highlighted.
pub struct PeopleGrid {
    people: Vec<Person>,
    min_width: usize,
    today: NaiveDate,
}

impl PeopleGrid {
    pub fn new(people: Vec<Person>, min_width: usize) -> Self {
        Self {
            people,
            min_width,
            today: Local::now().date_naive(),
        }
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn layout(&self, width: usize, highlight: Option<usize>) -> Columns {
        let theme = richdemo_console::theme();
        let mut grid = Columns::new().per_row(columns_for(width, self.min_width));
        for (i, person) in self.people.iter().enumerate() {
            let border = if Some(i) == highlight {
                &theme.highlight
            } else {
                &theme.border
            };
            grid.push(person.panel(border, self.today));
        }
        grid
    }

    /// Move the highlight once per (scaled) second for `cycles` steps, or
    /// forever when `cycles` is 0.
    pub fn cycle_highlight(&self, console: &DemoConsole, config: &ConsoleConfig) -> ConsoleResult<()> {
        if self.is_empty() {
            log::warn!(target: TARGET, "No items to highlight");
            return Ok(());
        }

        log::info!(target: TARGET, "Starting highlight cycle animation");
        let mut live = LiveDisplay::new(console);
        if let Some(rows) = console.height() {
            live = live.max_height(rows.saturating_sub(1));
        }

        let delay = config.scaled(Duration::from_secs(1));
        let mut step = 0;
        while config.grid_cycles == 0 || step < config.grid_cycles {
            let current = step % self.len();
            live.update(&self.layout(console.width(), Some(current)))?;
            log::info!(target: TARGET, "Highlighting {}", self.people[current].full_name());
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            step += 1;
        }

        live.stop()?;
        log::info!(target: TARGET, "Stopping highlight cycle animation");
        Ok(())
    }
}

/// Run the grid demo.
pub fn run(console: &DemoConsole, config: &ConsoleConfig) -> ConsoleResult<()> {
    let people = generate_people(&mut rand::rng(), config.grid_people);
    let grid = PeopleGrid::new(people, config.grid_min_width);
    log::info!(target: TARGET, "Added {} items to the grid", grid.len());
    log::info!(target: TARGET, "Starting demo of rich logging with grid layout");

    grid.cycle_highlight(console, config)?;
    log::info!(target: TARGET, "Demo completed");
    Ok(())
}
