//! Rolling-car model
//!
//! A car is loaded at the top of the ramp whenever the ramp is commanded.
//! It rolls frictionlessly down `ramp_length_m` to the door, where it sits
//! in the entry beam until the door opens. Released, it crosses the sensor
//! gap at its release speed and passes through the exit beam.
//!
//! ```text
//!   v = √(2·g·L·sin θ)       t_roll = √(2·L / (g·sin θ))
//! ```

/// Where the current car is
#[derive(Debug, Clone, Copy, PartialEq)]
enum Car {
    /// No car on the track, or the ramp is too flat to roll
    Empty,
    /// Rolling towards the door, or waiting at it
    Loaded { arrives_at: f64, speed: f64 },
    /// Door opened; the car left the door at `released_at`
    Released {
        arrives_at: f64,
        released_at: f64,
        speed: f64,
    },
}

/// Track geometry and the car on it
#[derive(Debug, Clone)]
pub struct Track {
    ramp_length_m: f64,
    car_length_m: f64,
    sensor_distance_m: f64,
    gravity_m_s2: f64,
    car: Car,
}

impl Track {
    pub fn new(
        ramp_length_m: f64,
        car_length_m: f64,
        sensor_distance_m: f64,
        gravity_m_s2: f64,
    ) -> Self {
        Self {
            ramp_length_m,
            car_length_m,
            sensor_distance_m,
            gravity_m_s2,
            car: Car::Empty,
        }
    }

    /// Speed a car reaches after rolling the ramp at `ramp_deg`
    pub fn release_speed(&self, ramp_deg: f64) -> f64 {
        let sin = ramp_deg.to_radians().sin();
        if sin <= 0.0 {
            return 0.0;
        }
        (2.0 * self.gravity_m_s2 * self.ramp_length_m * sin).sqrt()
    }

    /// Ramp moved: a fresh car starts rolling at `now`
    pub fn load(&mut self, ramp_deg: f64, now: f64) {
        let speed = self.release_speed(ramp_deg);
        if speed <= 0.0 {
            self.car = Car::Empty;
            return;
        }
        let accel = speed * speed / (2.0 * self.ramp_length_m);
        self.car = Car::Loaded {
            arrives_at: now + speed / accel,
            speed,
        };
    }

    /// Door moved to `target_deg` at `now`
    ///
    /// Any opening releases a loaded car. A car that has not reached the
    /// door yet rolls straight through.
    pub fn door_moved(&mut self, target_deg: f64, now: f64) {
        if target_deg <= 0.0 {
            return;
        }
        if let Car::Loaded { arrives_at, speed } = self.car {
            self.car = Car::Released {
                arrives_at,
                released_at: now.max(arrives_at),
                speed,
            };
        }
    }

    /// Time the car needs to clear a beam
    fn beam_time(&self, speed: f64) -> f64 {
        self.car_length_m / speed
    }

    /// Whether a car breaks the entry beam at `now`
    pub fn entry_blocked(&self, now: f64) -> bool {
        match self.car {
            Car::Empty => false,
            Car::Loaded { arrives_at, .. } => now >= arrives_at,
            Car::Released {
                arrives_at,
                released_at,
                speed,
            } => now >= arrives_at && now < released_at + self.beam_time(speed),
        }
    }

    /// Whether a car breaks the exit beam at `now`
    pub fn exit_blocked(&self, now: f64) -> bool {
        match self.car {
            Car::Released {
                released_at, speed, ..
            } => {
                let reaches = released_at + self.sensor_distance_m / speed;
                now >= reaches && now < reaches + self.beam_time(speed)
            }
            _ => false,
        }
    }
}
