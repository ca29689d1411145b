pub mod temperature {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Unit {
        #[default]
        Celsius,
        Fahrenheit,
    }

    pub fn c2f(temp_c: f64) -> f64 {
        temp_c * 9.0 / 5.0 + 32.0
    }

    /// Celsius values print as received; Fahrenheit is converted and rounded to one decimal.
    pub fn display(temp_c: f64, unit: Unit) -> String {
        match unit {
            Unit::Celsius => format!("{temp_c}°C"),
            Unit::Fahrenheit => format!("{:.1}°F", c2f(temp_c)),
        }
    }

    #[test]
    fn test_temperature() {
        assert_eq!(c2f(0.0), 32.0);
        assert_eq!(c2f(100.0), 212.0);
        assert_eq!(c2f(-40.0), -40.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(display(21.3, Unit::Celsius), "21.3°C");
        assert_eq!(display(5.0, Unit::Celsius), "5°C");
        assert_eq!(display(-2.5, Unit::Celsius), "-2.5°C");
        assert_eq!(display(20.0, Unit::Fahrenheit), "68.0°F");
    }
}
