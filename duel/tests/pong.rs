use duel::{Baseline, Config, Policy, Pong, Side, StepError, TwoPlayerEnvironment};

fn play (pong: & mut Pong, left: & dyn Policy, right: & dyn Policy) -> (f64, usize)
{
    let mut obs = pong.reset().unwrap();
    let mut total = 0.0;
    let mut length = 0;

    loop 
    {
        let opponent_obs = pong.opponent_observation();
        let step = pong.step(& left.predict(& obs), & right.predict(& opponent_obs)).unwrap();
        total += step.reward;
        length += 1;
        obs = step.observation;

        if step.done 
        {
            return (total, length);
        }
    }
}

struct Still;

impl Policy for Still 
{
    fn predict (& self, _observation: & Vec<f64>) -> Vec<f64>
    {
        vec![0.0]
    }
}

#[test]
fn stepping_before_reset_is_an_error ()
{
    let mut pong = Pong::new(Config::default());

    let err = pong.step(& vec![0.0], & vec![0.0]).unwrap_err();
    assert_eq!(err.downcast_ref::<StepError>(), Some(& StepError::EpisodeOver));
}

#[test]
fn malformed_actions_are_rejected ()
{
    let mut pong = Pong::new(Config::default());
    pong.reset().unwrap();

    let err = pong.step(& vec![0.0, 1.0], & vec![0.0]).unwrap_err();
    assert_eq!(err.downcast_ref::<StepError>(), Some(& StepError::ActionWidth { side: Side::Left, expected: 1, found: 2 }));

    let err = pong.step(& vec![0.0], & vec![f64::NAN]).unwrap_err();
    assert_eq!(err.downcast_ref::<StepError>(), Some(& StepError::NonFinite { side: Side::Right }));
}

#[test]
fn each_side_sees_a_mirrored_court ()
{
    let mut pong = Pong::new(Config::default());
    pong.seed(3);

    let left = pong.reset().unwrap();
    let right = pong.opponent_observation();

    assert_eq!(left.len(), pong.observation_size());
    assert_eq!(left[0], right[1]);
    assert_eq!(left[1], right[0]);
    assert!((left[2] + right[2] - 1.0).abs() < 1e-12);
    assert_eq!(left[3], right[3]);
    assert_eq!(left[4], - right[4]);
}

#[test]
fn rewards_account_for_lost_lives ()
{
    let config = Config { max_steps: 2000, ..Config::default() };
    let mut pong = Pong::new(config);
    pong.seed(11);

    let (total, length) = play(& mut pong, & Still, & Baseline::default());

    let lost_left = (config.lives - pong.lives(Side::Left)) as f64;
    let lost_right = (config.lives - pong.lives(Side::Right)) as f64;

    assert!(length <= config.max_steps);
    assert_eq!(total, lost_right - lost_left);
    assert!(lost_left > 0.0);
}

#[test]
fn finished_episodes_must_be_reset ()
{
    let config = Config { max_steps: 25, ..Config::default() };
    let mut pong = Pong::new(config);

    let (_, length) = play(& mut pong, & Baseline::default(), & Baseline::default());
    assert!(length <= 25);

    let err = pong.step(& vec![0.0], & vec![0.0]).unwrap_err();
    assert!(err.downcast_ref::<StepError>().is_some());

    pong.reset().unwrap();
    assert!(pong.step(& vec![0.0], & vec![0.0]).is_ok());
}

#[test]
fn seeding_makes_episodes_repeatable ()
{
    let mut first = Pong::new(Config::default());
    let mut second = Pong::new(Config::default());
    first.seed(17);
    second.seed(17);

    assert_eq!(play(& mut first, & Still, & Baseline::default()), play(& mut second, & Still, & Baseline::default()));
    assert_eq!(first.render(), second.render());
}
