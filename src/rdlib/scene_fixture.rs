use std::path::{Path, PathBuf};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rectdraw_domain::{RdResult, TPtF};
use serde::{ser::SerializeMap, Serialize, Serializer};
use tracing::info;

use crate::{export::to_yaml_string, file_util};

pub const DEFAULT_ENV_COUNT: usize = 5;
pub const DEFAULT_FIXTURE_FILENAME: &str = "multi_env_dict_config.yaml";
const ENV_PREFIX: &str = "quadrotor_env_";
const BOX_RANGE: (TPtF, TPtF) = (0.0, 100.0);
const SIM_DT_RANGE: (TPtF, TPtF) = (0.1, 1.0);

fn round2(x: TPtF) -> TPtF {
    (x * 100.0).round() / 100.0
}

fn sample_rounded(rng: &mut impl Rng, range: (TPtF, TPtF)) -> TPtF {
    round2(rng.gen_range(range.0..=range.1))
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EnvCfg {
    pub collect_data: String,
    pub bounding_box: [TPtF; 3],
    pub bounding_box_origin: [TPtF; 3],
    pub sim_dt: TPtF,
}

impl EnvCfg {
    pub fn sample(rng: &mut impl Rng) -> Self {
        let mut sample_box = || {
            [
                sample_rounded(rng, BOX_RANGE),
                sample_rounded(rng, BOX_RANGE),
                sample_rounded(rng, BOX_RANGE),
            ]
        };
        let bounding_box = sample_box();
        let bounding_box_origin = sample_box();
        Self {
            collect_data: "yes".to_string(),
            bounding_box,
            bounding_box_origin,
            sim_dt: sample_rounded(rng, SIM_DT_RANGE),
        }
    }
}

/// Simulation environments named `quadrotor_env_1` to `quadrotor_env_n`.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneFixture {
    envs: Vec<(String, EnvCfg)>,
}

impl SceneFixture {
    pub fn generate(count: usize, rng: &mut impl Rng) -> Self {
        let envs = (1..=count)
            .map(|i| (format!("{ENV_PREFIX}{i}"), EnvCfg::sample(rng)))
            .collect();
        Self { envs }
    }
    pub fn env_count(&self) -> usize {
        self.envs.len()
    }
    pub fn envs(&self) -> impl Iterator<Item = (&str, &EnvCfg)> {
        self.envs.iter().map(|(n, e)| (n.as_str(), e))
    }
}

struct OrderedEnvs<'a>(&'a [(String, EnvCfg)]);

impl Serialize for OrderedEnvs<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, env) in self.0 {
            map.serialize_entry(name, env)?;
        }
        map.end()
    }
}

impl Serialize for SceneFixture {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("env_count", &self.env_count())?;
        map.serialize_entry("envs", &OrderedEnvs(&self.envs))?;
        map.end()
    }
}

/// Generates `count` environments and writes them to `path`. Same seed, same file.
pub fn write_scene_fixture(path: &Path, count: usize, seed: Option<u64>) -> RdResult<PathBuf> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let fixture = SceneFixture::generate(count, &mut rng);
    let yaml_str = to_yaml_string(&fixture)?;
    file_util::write(path, yaml_str)?;
    info!("wrote {count} environments to {path:?}");
    Ok(path.to_path_buf())
}

#[cfg(test)]
use crate::{defer_file_removal, file_util::make_test_folder};

#[test]
fn test_generate() {
    let mut rng = StdRng::seed_from_u64(3);
    let fixture = SceneFixture::generate(DEFAULT_ENV_COUNT, &mut rng);
    assert_eq!(fixture.env_count(), 5);
    let names = fixture.envs().map(|(n, _)| n).collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            "quadrotor_env_1",
            "quadrotor_env_2",
            "quadrotor_env_3",
            "quadrotor_env_4",
            "quadrotor_env_5"
        ]
    );
    let is_rounded = |x: TPtF| (x * 100.0 - (x * 100.0).round()).abs() < 1e-6;
    for (_, env) in fixture.envs() {
        assert_eq!(env.collect_data, "yes");
        for v in env.bounding_box.iter().chain(env.bounding_box_origin.iter()) {
            assert!((0.0..=100.0).contains(v));
            assert!(is_rounded(*v));
        }
        assert!((0.1..=1.0).contains(&env.sim_dt));
        assert!(is_rounded(env.sim_dt));
    }
    assert_eq!(SceneFixture::generate(0, &mut rng).env_count(), 0);
}

#[test]
fn test_write_scene_fixture() -> RdResult<()> {
    let folder = make_test_folder("scene_fixture")?;
    let path_1 = folder.join("envs_1.yaml");
    let path_2 = folder.join("envs_2.yaml");
    defer_file_removal!(&path_1);
    defer_file_removal!(&path_2);
    write_scene_fixture(&path_1, 3, Some(42))?;
    write_scene_fixture(&path_2, 3, Some(42))?;
    let s_1 = file_util::read_to_string(&path_1)?;
    let s_2 = file_util::read_to_string(&path_2)?;
    assert_eq!(s_1, s_2);
    assert!(s_1.starts_with("env_count: 3\nenvs:\n  quadrotor_env_1:\n"));
    let parsed: serde_yaml::Value = serde_yaml::from_str(&s_1).map_err(rectdraw_domain::to_rd)?;
    assert_eq!(parsed["env_count"].as_u64(), Some(3));
    let env_3 = &parsed["envs"]["quadrotor_env_3"];
    assert_eq!(env_3["collect_data"].as_str(), Some("yes"));
    assert_eq!(env_3["bounding_box"].as_sequence().map(|s| s.len()), Some(3));
    assert!(s_1.find("quadrotor_env_2") < s_1.find("quadrotor_env_3"));
    Ok(())
}
