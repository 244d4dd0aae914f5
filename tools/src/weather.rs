use crate::args::ToolArgs;
use crate::descriptor::{InputKind, InputSpec, OutputType, ToolDescriptor};
use crate::error::ToolError;
use crate::Tool;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCondition {
    pub condition: &'static str,
    pub temp_c: i32,
}

pub const CONDITIONS: [WeatherCondition; 3] = [
    WeatherCondition { condition: "Rainy", temp_c: 15 },
    WeatherCondition { condition: "Clear", temp_c: 25 },
    WeatherCondition { condition: "Windy", temp_c: 20 },
];

/// Source of the index used to pick a condition. `len` is never zero.
pub trait Chooser: Send + Sync {
    fn choose(&self, len: usize) -> usize;
}

pub struct RandomChooser;

impl Chooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible choices from a fixed seed.
pub struct SeededChooser(Mutex<StdRng>);

impl SeededChooser {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl Chooser for SeededChooser {
    fn choose(&self, len: usize) -> usize {
        self.0.lock().gen_range(0..len)
    }
}

/// Dummy weather for a location.
pub struct WeatherTool<R> {
    chooser: R,
    descriptor: ToolDescriptor,
}

impl<R: Chooser> WeatherTool<R> {
    pub fn new(chooser: R) -> Self {
        let descriptor = ToolDescriptor {
            name: "weather_info",
            description: "Fetches dummy weather information for a given location.",
            inputs: vec![InputSpec::new("location", InputKind::String, "Location name.")],
            output_type: OutputType::String,
        };
        Self { chooser, descriptor }
    }

    pub fn report(&self, location: &str) -> String {
        let idx = self.chooser.choose(CONDITIONS.len()).min(CONDITIONS.len() - 1);
        let data = CONDITIONS[idx];
        format!("Weather in {location}: {}, {}°C", data.condition, data.temp_c)
    }
}

#[async_trait]
impl<R: Chooser> Tool for WeatherTool<R> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let location = args.string("location")?.trim();
        if location.is_empty() {
            return Err(ToolError::InvalidArgument("location must not be empty".into()));
        }
        Ok(self.report(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(usize);

    impl Chooser for Fixed {
        fn choose(&self, _len: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn covers_every_outcome() {
        let reports: Vec<String> = (0..CONDITIONS.len()).map(|i| WeatherTool::new(Fixed(i)).report("Paris")).collect();
        assert_eq!(
            reports,
            vec!["Weather in Paris: Rainy, 15°C", "Weather in Paris: Clear, 25°C", "Weather in Paris: Windy, 20°C"]
        );
    }

    #[test]
    fn seeded_chooser_is_reproducible_and_in_range() {
        let a = SeededChooser::new(7);
        let b = SeededChooser::new(7);
        for _ in 0..50 {
            let x = a.choose(3);
            assert_eq!(x, b.choose(3));
            assert!(x < 3);
        }
    }

    #[tokio::test]
    async fn random_reports_are_one_of_the_known_set() {
        let tool = WeatherTool::new(RandomChooser);
        let expected: Vec<String> = (0..CONDITIONS.len()).map(|i| WeatherTool::new(Fixed(i)).report("Oslo")).collect();
        for _ in 0..20 {
            let args = ToolArgs::bind(tool.descriptor(), json!({"location": "Oslo"})).unwrap();
            let out = tool.execute(args).await.unwrap();
            assert!(expected.contains(&out), "{out}");
        }
    }

    #[tokio::test]
    async fn blank_location_is_rejected() {
        let tool = WeatherTool::new(Fixed(0));
        let args = ToolArgs::bind(tool.descriptor(), json!({"location": " "})).unwrap();
        assert!(matches!(tool.execute(args).await, Err(ToolError::InvalidArgument(_))));
    }
}
