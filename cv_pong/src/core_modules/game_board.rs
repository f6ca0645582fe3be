// THEORY:
// The `GameBoard` is the Physics & Collision Engine. It owns the ball, both
// paddles, the score and the speed factor, and it is the only thing that ever
// changes them.
//
// Key architectural principles:
// 1.  **Integer Physics**: positions and velocities are whole pixels per tick.
//     The speed factor is fractional, and every velocity built from it is
//     truncated toward zero, so the same inputs always give the same game.
// 2.  **Look Ahead**: every collision rule tests where the ball *would* be after
//     this tick's move (`position + velocity`) before the move is committed.
// 3.  **Independent Rules**: walls, the two scoring boundaries and the two
//     paddle faces are checked one after another, each against the ball as the
//     previous rule left it. Nothing short-circuits, so a single tick can both
//     bounce off a wall and come off a paddle.
// 4.  **Zone Deflection**: a paddle face is three equal zones. The middle third
//     returns the ball flat, the outer thirds send it away at an angle.
// 5.  **Terminal State**: reaching the winning score freezes the board. Frames
//     are still rendered so the winner announcement stays on screen.

use crate::core_modules::draw;
use crate::core_modules::frame::{RgbFrame, Side};
use crate::core_modules::settings::BoardConfig;
use image::{Rgb, imageops};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver { winner: Side },
}

/// The ball square, positioned by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Ball {
    /// Sets the velocity, truncating both components toward zero.
    fn set_velocity(&mut self, dx: f64, dy: f64) {
        self.dx = dx as i32;
        self.dy = dy as i32;
    }

    fn next_x(&self) -> i32 {
        self.x + self.dx
    }

    fn next_y(&self) -> i32 {
        self.y + self.dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paddle {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Which third of a paddle face the ball met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Top,
    Middle,
    Bottom,
}

/// Text the display sink should draw over the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    /// Bottom-left corner of the text baseline.
    pub origin: (i32, i32),
    pub color: Rgb<u8>,
}

/// One finished tick: the board image and the caption to draw on top of it.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub image: RgbFrame,
    pub caption: Caption,
}

pub struct GameBoard {
    config: BoardConfig,
    ball: Ball,
    left_paddle: Paddle,
    right_paddle: Paddle,
    score: Score,
    speed_factor: f64,
    state: GameState,
}

impl GameBoard {
    pub fn new(config: BoardConfig) -> Self {
        let (x, y) = config.ball_home();
        let home = config.paddle_home();
        Self {
            ball: Ball {
                x,
                y,
                dx: config.base_speed,
                dy: 0,
            },
            left_paddle: Paddle {
                x: config.left_paddle_x(),
                y: home,
            },
            right_paddle: Paddle {
                x: config.right_paddle_x(),
                y: home,
            },
            score: Score::default(),
            speed_factor: 0.0,
            state: GameState::Playing,
            config,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn left_paddle(&self) -> Paddle {
        self.left_paddle
    }

    pub fn right_paddle(&self) -> Paddle {
        self.right_paddle
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Advances the game by one tick over `background` and renders the result.
    ///
    /// Paddle targets outside the table are clamped, never rejected. Once the
    /// game is over the board only redraws its final state.
    pub fn play(&mut self, background: RgbFrame, left_paddle_y: i32, right_paddle_y: i32) -> RenderedFrame {
        let mut image = self.fit_background(background);

        if self.is_playing() {
            // --- 1. Paddles ---
            self.left_paddle.y = self.config.clamp_paddle_y(left_paddle_y);
            self.right_paddle.y = self.config.clamp_paddle_y(right_paddle_y);

            // --- 2. Collisions ---
            self.check_collisions();

            // --- 3. Move ---
            self.ball.x += self.ball.dx;
            self.ball.y += self.ball.dy;

            // --- 4. Result ---
            self.update_state();
        }

        self.draw_paddles(&mut image);
        self.draw_ball(&mut image);
        RenderedFrame {
            image,
            caption: self.caption(),
        }
    }

    fn fit_background(&self, background: RgbFrame) -> RgbFrame {
        let (w, h) = (self.config.width, self.config.height);
        if background.dimensions() == (w, h) {
            background
        } else if background.width() == 0 || background.height() == 0 {
            RgbFrame::new(w, h)
        } else {
            imageops::resize(&background, w, h, imageops::FilterType::Triangle)
        }
    }

    fn check_collisions(&mut self) {
        let width = self.config.width as i32;
        let height = self.config.height as i32;
        let ball_size = self.config.ball_size;
        let base = self.config.base_speed as f64;

        // Top and bottom walls.
        if self.ball.next_y() + ball_size >= height - 1 || self.ball.next_y() <= 0 {
            self.ball.dy = -self.ball.dy;
        }

        // Past the right edge: the left player scores.
        if self.ball.next_x() + ball_size >= width - 1 {
            self.point_scored(Side::Left, -base - self.speed_factor);
        }

        // Past the left edge: the right player scores.
        if self.ball.next_x() <= 0 {
            self.point_scored(Side::Right, base + self.speed_factor);
        }

        if self.ball.next_x() + ball_size >= self.right_paddle.x {
            if let Some(zone) = self.zone_hit(self.right_paddle) {
                self.deflect(zone, -base - self.speed_factor);
            }
        }

        if self.ball.next_x() <= self.left_paddle.x + self.config.paddle_width {
            if let Some(zone) = self.zone_hit(self.left_paddle) {
                self.deflect(zone, base + self.speed_factor);
            }
        }
    }

    fn point_scored(&mut self, scorer: Side, serve_dx: f64) {
        let (x, y) = self.config.ball_home();
        self.ball.x = x;
        self.ball.y = y;
        self.ball.set_velocity(serve_dx, 0.0);
        match scorer {
            Side::Left => self.score.left += 1,
            Side::Right => self.score.right += 1,
        }
        self.speed_factor += self.config.speed_increment;
        info!(
            player = scorer.player_number(),
            left = self.score.left,
            right = self.score.right,
            "point scored"
        );
    }

    /// Bottom, middle and top thirds are tried in that order; the first one the
    /// ball's next vertical extent overlaps wins.
    fn zone_hit(&self, paddle: Paddle) -> Option<Zone> {
        let top = self.ball.next_y();
        let bottom = top + self.config.ball_size;
        let third = self.config.paddle_third();
        let paddle_height = self.config.paddle_height;

        if bottom >= paddle.y + third * 2 && top <= paddle.y + paddle_height {
            Some(Zone::Bottom)
        } else if bottom >= paddle.y + third && top <= paddle.y + paddle_height - third {
            Some(Zone::Middle)
        } else if bottom >= paddle.y && top <= paddle.y + paddle_height - third * 2 {
            Some(Zone::Top)
        } else {
            None
        }
    }

    fn deflect(&mut self, zone: Zone, dx: f64) {
        let angled = self.config.angled_speed as f64;
        let dy = match zone {
            Zone::Bottom => angled + self.speed_factor,
            Zone::Middle => 0.0,
            Zone::Top => -angled - self.speed_factor,
        };
        self.ball.set_velocity(dx, dy);
    }

    fn update_state(&mut self) {
        let winning = self.config.winning_score;
        let winner = if self.score.left >= winning {
            Some(Side::Left)
        } else if self.score.right >= winning {
            Some(Side::Right)
        } else {
            None
        };
        if let Some(winner) = winner {
            info!(player = winner.player_number(), "game over");
            self.state = GameState::GameOver { winner };
        }
    }

    fn draw_paddles(&self, image: &mut RgbFrame) {
        let (w, h) = (self.config.paddle_width, self.config.paddle_height);
        let left = self.left_paddle;
        let right = self.right_paddle;
        draw::fill_rect(image, left.x, left.y, w, h, self.config.left_paddle_color);
        draw::fill_rect(image, right.x, right.y, w, h, self.config.right_paddle_color);
    }

    fn draw_ball(&self, image: &mut RgbFrame) {
        let size = self.config.ball_size;
        draw::fill_rect(image, self.ball.x, self.ball.y, size, size, self.config.ball_color);
    }

    fn caption(&self) -> Caption {
        let center = self.config.width as i32 / 2;
        let baseline = self.config.border_width * 15;
        let (text, origin) = match self.state {
            GameState::GameOver { winner } => (
                format!("PLAYER {} WINS!", winner.player_number()),
                (center - 143, baseline),
            ),
            GameState::Playing => (
                format!("{} | {}", self.score.left, self.score.right),
                (center - 41, baseline),
            ),
        };
        Caption {
            text,
            origin,
            color: self.config.caption_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> GameBoard {
        GameBoard::new(BoardConfig::default())
    }

    fn blank() -> RgbFrame {
        RgbFrame::new(640, 480)
    }

    /// Plays one tick with both paddles parked at their home position.
    fn tick(board: &mut GameBoard) -> RenderedFrame {
        let home = board.config().paddle_home();
        board.play(blank(), home, home)
    }

    #[test]
    fn new_board_serves_right_from_center() {
        let board = board();
        assert_eq!(
            board.ball(),
            Ball {
                x: 304,
                y: 224,
                dx: 11,
                dy: 0
            }
        );
        assert_eq!(board.left_paddle(), Paddle { x: 6, y: 180 });
        assert_eq!(board.right_paddle(), Paddle { x: 615, y: 180 });
        assert_eq!(board.score(), Score::default());
        assert!(board.is_playing());
    }

    #[test]
    fn ball_moves_in_a_straight_line() {
        let mut board = board();
        for n in 1..=20 {
            tick(&mut board);
            assert_eq!(board.ball().x, 304 + 11 * n);
            assert_eq!(board.ball().y, 224);
        }
    }

    #[test]
    fn top_wall_reflects_vertical_velocity() {
        let mut board = board();
        board.ball = Ball {
            x: 300,
            y: 5,
            dx: 11,
            dy: -11,
        };
        tick(&mut board);
        assert_eq!(board.ball().dy, 11);
        assert_eq!(board.ball().dx, 11);
        assert_eq!(board.ball().y, 16);
    }

    #[test]
    fn bottom_wall_reflects_vertical_velocity() {
        let mut board = board();
        board.ball = Ball {
            x: 300,
            y: 430,
            dx: -11,
            dy: 11,
        };
        tick(&mut board);
        // 430 + 11 + 33 = 474 < 479, no bounce yet.
        assert_eq!(board.ball().dy, 11);
        tick(&mut board);
        // 441 + 11 + 33 = 485 >= 479.
        assert_eq!(board.ball().dy, -11);
        assert_eq!(board.ball().dx, -11);
        assert_eq!(board.ball().y, 430);
    }

    #[test]
    fn right_boundary_scores_for_left_and_resets() {
        let mut board = board();
        board.ball = Ball {
            x: 600,
            y: 20,
            dx: 11,
            dy: 0,
        };
        // Right paddle parked low so the ball slips past above it.
        board.play(blank(), 180, 400);
        assert_eq!(board.score(), Score { left: 1, right: 0 });
        assert_eq!(board.speed_factor(), 1.5);
        // Reset to center, then moved by the serve velocity.
        assert_eq!(board.ball().dx, -11);
        assert_eq!(board.ball().dy, 0);
        assert_eq!(board.ball().x, 304 - 11);
        assert_eq!(board.ball().y, 224);
    }

    #[test]
    fn left_boundary_scores_for_right_with_speed_factor() {
        let mut board = board();
        board.speed_factor = 3.0;
        board.ball = Ball {
            x: 5,
            y: 440,
            dx: -11,
            dy: 0,
        };
        board.play(blank(), 1, 180);
        assert_eq!(board.score(), Score { left: 0, right: 1 });
        assert_eq!(board.ball().dx, 14);
        assert_eq!(board.speed_factor(), 4.5);
    }

    #[test]
    fn serve_velocity_truncates_toward_zero() {
        let mut board = board();
        board.speed_factor = 1.5;
        board.ball = Ball {
            x: 600,
            y: 20,
            dx: 11,
            dy: 0,
        };
        board.play(blank(), 180, 400);
        // -11 - 1.5 = -12.5 -> -12
        assert_eq!(board.ball().dx, -12);
    }

    #[test]
    fn right_paddle_middle_third_returns_flat() {
        let mut board = board();
        let mut ticks = 0;
        while board.ball().dx > 0 {
            tick(&mut board);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(board.ball().dx, -11);
        assert_eq!(board.ball().dy, 0);
        assert_eq!(board.score(), Score::default());
    }

    #[test]
    fn right_paddle_outer_thirds_add_spin() {
        // Ball low on the paddle: bottom third sends it down.
        let mut board = board();
        board.ball = Ball {
            x: 575,
            y: 280,
            dx: 11,
            dy: 0,
        };
        tick(&mut board);
        assert_eq!((board.ball().dx, board.ball().dy), (-11, 11));

        // Ball high on the paddle: top third sends it up.
        let mut board = self::board();
        board.ball = Ball {
            x: 575,
            y: 160,
            dx: 11,
            dy: 0,
        };
        tick(&mut board);
        assert_eq!((board.ball().dx, board.ball().dy), (-11, -11));
    }

    #[test]
    fn left_paddle_zones_mirror_the_right() {
        let cases: [(i32, i32); 3] = [(280, 11), (224, 0), (160, -11)];
        for (y, expected_dy) in cases {
            let mut board = board();
            board.speed_factor = 3.0;
            board.ball = Ball { x: 30, y, dx: -11, dy: 0 };
            tick(&mut board);
            let expected = if expected_dy == 0 {
                0
            } else {
                expected_dy + 3 * expected_dy.signum()
            };
            assert_eq!(board.ball().dx, 14, "y = {y}");
            assert_eq!(board.ball().dy, expected, "y = {y}");
        }
    }

    #[test]
    fn missing_the_paddle_keeps_velocity() {
        let mut board = board();
        board.ball = Ball {
            x: 575,
            y: 20,
            dx: 11,
            dy: 0,
        };
        board.play(blank(), 180, 300);
        assert_eq!(board.ball().dx, 11);
    }

    #[test]
    fn wall_and_paddle_rules_both_apply_in_one_tick() {
        let mut board = board();
        // Heading up into the top wall while reaching the left paddle parked at the top.
        board.ball = Ball {
            x: 30,
            y: 5,
            dx: -11,
            dy: -11,
        };
        board.play(blank(), 1, 180);
        // Wall flips dy to +11; the paddle then sets a fresh velocity from its zone.
        // next_y = 16, bottom 49: that overlaps the middle third of a paddle at y = 1.
        assert_eq!(board.ball().dx, 11);
        assert_eq!(board.ball().dy, 0);
    }

    #[test]
    fn paddles_are_clamped_into_the_table() {
        let mut board = board();
        board.play(blank(), -500, 10_000);
        assert_eq!(board.left_paddle().y, 1);
        assert_eq!(board.right_paddle().y, 359);
    }

    #[test]
    fn seventh_point_ends_the_game_and_freezes_the_ball() {
        let mut board = board();
        board.score.left = 6;
        board.ball = Ball {
            x: 600,
            y: 20,
            dx: 11,
            dy: 0,
        };
        let frame = board.play(blank(), 180, 400);
        assert_eq!(board.state(), GameState::GameOver { winner: Side::Left });
        assert_eq!(frame.caption.text, "PLAYER 1 WINS!");
        assert_eq!(frame.caption.origin, (320 - 143, 45));

        let frozen = board.ball();
        let again = board.play(blank(), 0, 0);
        assert_eq!(board.ball(), frozen);
        assert_eq!(board.score().left, 7);
        assert_eq!(again.caption.text, "PLAYER 1 WINS!");
    }

    #[test]
    fn score_caption_is_centered() {
        let mut board = board();
        let frame = tick(&mut board);
        assert_eq!(frame.caption.text, "0 | 0");
        assert_eq!(frame.caption.origin, (279, 45));
        assert_eq!(frame.caption.color, Rgb([255, 0, 255]));
    }

    #[test]
    fn render_draws_paddles_and_ball() {
        let mut board = board();
        let frame = tick(&mut board);
        let config = BoardConfig::default();
        assert_eq!(*frame.image.get_pixel(6, 180), config.left_paddle_color);
        assert_eq!(*frame.image.get_pixel(632, 299), config.right_paddle_color);
        let ball = board.ball();
        assert_eq!(*frame.image.get_pixel(ball.x as u32, ball.y as u32), config.ball_color);
        assert_eq!(*frame.image.get_pixel(320, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn background_of_another_size_is_resized() {
        let mut board = board();
        let frame = board.play(RgbFrame::new(320, 240), 180, 180);
        assert_eq!(frame.image.dimensions(), (640, 480));
        let frame = board.play(RgbFrame::new(0, 0), 180, 180);
        assert_eq!(frame.image.dimensions(), (640, 480));
    }
}
