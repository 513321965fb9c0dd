//! In-memory provider used by tests across the workspace.
//!
//! `MockProvider` implements every capability trait over fixture data added
//! through `add_*` builders. Destructive calls are recorded so tests can
//! assert on what was deleted and in which order. Run statuses for the halt
//! poll loop are scripted as a queue.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::api::{
    AlarmApi, BalancerApi, ComputeApi, IdentityApi, ImageData, InstanceProfileData,
    LoadBalancerData, OrchestrationApi, RunStatus, RunSummary, ScalingApi, ScalingGroupData,
    SecurityGroupData, StorageApi, SubnetData, TagDescription, TargetApi, TargetGroupData,
    TargetHealthData,
};
use crate::error::CloudResult;
use crate::tags::{self, Tag};

#[derive(Debug, Default)]
struct Recorded {
    deleted_groups: Vec<String>,
    terminated_instances: Vec<String>,
    deleted_alarms: Vec<String>,
    written_objects: Vec<(String, Vec<u8>)>,
    call_order: Vec<&'static str>,
    target_health_calls: u32,
}

/// Fixture-backed implementation of every provider capability trait.
#[derive(Debug, Default)]
pub struct MockProvider {
    scaling_groups: Vec<ScalingGroupData>,
    target_groups: Vec<(TargetGroupData, Vec<Tag>)>,
    load_balancers: Vec<(LoadBalancerData, Vec<Tag>)>,
    security_groups: HashMap<String, SecurityGroupData>,
    subnets: HashMap<String, SubnetData>,
    images: Vec<(String, ImageData)>,
    profiles: HashMap<String, InstanceProfileData>,
    alarms: Vec<(String, String)>,
    runs: Vec<RunSummary>,
    scripted_statuses: Mutex<VecDeque<RunStatus>>,
    recorded: Mutex<Recorded>,
}

impl MockProvider {
    /// Register a fully tagged scaling group with one member instance.
    /// Returns the generated group name.
    pub fn add_scaling_group(
        &mut self,
        project: &str,
        config: &str,
        service: &str,
        release: &str,
    ) -> String {
        let name = format!("{project}-{config}-{service}-{release}");
        self.scaling_groups.push(ScalingGroupData {
            name: name.clone(),
            instance_ids: vec![format!("i-{name}")],
            tags: vec![
                Tag::new(tags::PROJECT_NAME, project),
                Tag::new(tags::CONFIG_NAME, config),
                Tag::new(tags::SERVICE_NAME, service),
                Tag::new(tags::RELEASE_ID, release),
            ],
        });
        name
    }

    /// Register a scaling group carrying only project/config tags.
    pub fn add_untagged_scaling_group(&mut self, name: &str, project: &str, config: &str) {
        self.scaling_groups.push(ScalingGroupData {
            name: name.to_string(),
            instance_ids: vec![],
            tags: vec![
                Tag::new(tags::PROJECT_NAME, project),
                Tag::new(tags::CONFIG_NAME, config),
            ],
        });
    }

    pub fn add_target_group(&mut self, name: &str, project: &str, config: &str, service: &str) {
        self.target_groups.push((
            TargetGroupData {
                arn: format!("arn:{name}"),
                name: name.to_string(),
            },
            service_tags(project, config, service),
        ));
    }

    pub fn add_load_balancer(&mut self, name: &str, project: &str, config: &str, service: &str) {
        self.load_balancers.push((
            LoadBalancerData {
                name: name.to_string(),
            },
            service_tags(project, config, service),
        ));
    }

    pub fn add_security_group(
        &mut self,
        name: &str,
        id: &str,
        project: &str,
        config: &str,
        service: &str,
    ) {
        self.security_groups.insert(
            name.to_string(),
            SecurityGroupData {
                id: id.to_string(),
                tags: service_tags(project, config, service),
            },
        );
    }

    pub fn add_subnet(&mut self, name: &str, id: &str) {
        self.subnets.insert(
            name.to_string(),
            SubnetData {
                id: id.to_string(),
                tags: managed_tags(name),
            },
        );
    }

    /// Register an image. Registering the same name twice makes the lookup
    /// ambiguous, which finders must reject.
    pub fn add_image(&mut self, name: &str, id: &str) {
        self.images.push((
            name.to_string(),
            ImageData {
                id: id.to_string(),
                tags: managed_tags(name),
            },
        ));
    }

    /// Register an image that carries no `ManagedBy` tag.
    pub fn add_unmanaged_image(&mut self, name: &str, id: &str) {
        self.images.push((
            name.to_string(),
            ImageData {
                id: id.to_string(),
                tags: vec![Tag::new("Name", name)],
            },
        ));
    }

    /// Register a subnet that carries no `ManagedBy` tag.
    pub fn add_unmanaged_subnet(&mut self, name: &str, id: &str) {
        self.subnets.insert(
            name.to_string(),
            SubnetData {
                id: id.to_string(),
                tags: vec![Tag::new("Name", name)],
            },
        );
    }

    pub fn add_profile(&mut self, name: &str, arn: &str, path: &str) {
        self.profiles.insert(
            name.to_string(),
            InstanceProfileData {
                arn: arn.to_string(),
                path: path.to_string(),
            },
        );
    }

    pub fn add_alarm(&mut self, group: &str, alarm: &str) {
        self.alarms.push((group.to_string(), alarm.to_string()));
    }

    pub fn add_run(&mut self, name: &str, id: &str) {
        self.runs.push(RunSummary {
            name: name.to_string(),
            id: id.to_string(),
        });
    }

    /// Queue the statuses `describe_run` reports, in order. Once the queue
    /// drains, further calls report `Succeeded`.
    pub fn script_run_statuses(&mut self, statuses: &[RunStatus]) {
        let mut scripted = self.scripted_statuses.lock().unwrap();
        scripted.extend(statuses.iter().copied());
    }

    pub fn deleted_groups(&self) -> Vec<String> {
        self.recorded.lock().unwrap().deleted_groups.clone()
    }

    pub fn terminated_instances(&self) -> Vec<String> {
        self.recorded.lock().unwrap().terminated_instances.clone()
    }

    pub fn deleted_alarms(&self) -> Vec<String> {
        self.recorded.lock().unwrap().deleted_alarms.clone()
    }

    /// Keys of every object written to durable storage.
    pub fn written_keys(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .written_objects
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Names of the mutating calls, in invocation order.
    pub fn call_order(&self) -> Vec<&'static str> {
        self.recorded.lock().unwrap().call_order.clone()
    }

    pub fn target_health_calls(&self) -> u32 {
        self.recorded.lock().unwrap().target_health_calls
    }

    fn record(&self, call: &'static str) -> std::sync::MutexGuard<'_, Recorded> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.call_order.push(call);
        recorded
    }
}

fn service_tags(project: &str, config: &str, service: &str) -> Vec<Tag> {
    vec![
        Tag::new(tags::PROJECT_NAME, project),
        Tag::new(tags::CONFIG_NAME, config),
        Tag::new(tags::SERVICE_NAME, service),
    ]
}

fn managed_tags(name: &str) -> Vec<Tag> {
    vec![
        Tag::new("Name", name),
        Tag::new(tags::MANAGED_BY, tags::MANAGED_BY_VALUE),
    ]
}

impl ScalingApi for MockProvider {
    async fn describe_scaling_groups(&self) -> CloudResult<Vec<ScalingGroupData>> {
        Ok(self.scaling_groups.clone())
    }

    async fn terminate_instances(&self, instance_ids: &[String]) -> CloudResult<()> {
        self.record("terminate_instances")
            .terminated_instances
            .extend(instance_ids.iter().cloned());
        Ok(())
    }

    async fn delete_scaling_group(&self, name: &str) -> CloudResult<()> {
        self.record("delete_scaling_group")
            .deleted_groups
            .push(name.to_string());
        Ok(())
    }
}

impl TargetApi for MockProvider {
    async fn describe_target_groups(&self, names: &[String]) -> CloudResult<Vec<TargetGroupData>> {
        Ok(self
            .target_groups
            .iter()
            .filter(|(data, _)| names.contains(&data.name))
            .map(|(data, _)| data.clone())
            .collect())
    }

    async fn describe_target_group_tags(
        &self,
        arns: &[String],
    ) -> CloudResult<Vec<TagDescription>> {
        Ok(self
            .target_groups
            .iter()
            .filter(|(data, _)| arns.contains(&data.arn))
            .map(|(data, group_tags)| TagDescription {
                resource_id: data.arn.clone(),
                tags: group_tags.clone(),
            })
            .collect())
    }

    async fn describe_target_health(
        &self,
        _arn: &str,
        instance_ids: &[String],
    ) -> CloudResult<Vec<TargetHealthData>> {
        self.recorded.lock().unwrap().target_health_calls += 1;
        Ok(instance_ids
            .iter()
            .map(|id| TargetHealthData {
                instance_id: id.clone(),
                state: "healthy".to_string(),
            })
            .collect())
    }
}

impl BalancerApi for MockProvider {
    async fn describe_load_balancers(
        &self,
        names: &[String],
    ) -> CloudResult<Vec<LoadBalancerData>> {
        Ok(self
            .load_balancers
            .iter()
            .filter(|(data, _)| names.contains(&data.name))
            .map(|(data, _)| data.clone())
            .collect())
    }

    async fn describe_load_balancer_tags(
        &self,
        names: &[String],
    ) -> CloudResult<Vec<TagDescription>> {
        Ok(self
            .load_balancers
            .iter()
            .filter(|(data, _)| names.contains(&data.name))
            .map(|(data, lb_tags)| TagDescription {
                resource_id: data.name.clone(),
                tags: lb_tags.clone(),
            })
            .collect())
    }
}

impl ComputeApi for MockProvider {
    async fn describe_security_groups(&self, name: &str) -> CloudResult<Vec<SecurityGroupData>> {
        Ok(self.security_groups.get(name).cloned().into_iter().collect())
    }

    async fn describe_subnets(&self, name: &str) -> CloudResult<Vec<SubnetData>> {
        Ok(self.subnets.get(name).cloned().into_iter().collect())
    }

    async fn describe_images(&self, name: &str) -> CloudResult<Vec<ImageData>> {
        Ok(self
            .images
            .iter()
            .filter(|(image_name, _)| image_name == name)
            .map(|(_, data)| data.clone())
            .collect())
    }
}

impl IdentityApi for MockProvider {
    async fn find_instance_profile(
        &self,
        name: &str,
    ) -> CloudResult<Option<InstanceProfileData>> {
        Ok(self.profiles.get(name).cloned())
    }
}

impl AlarmApi for MockProvider {
    async fn alarm_names_for_group(&self, group: &str) -> CloudResult<Vec<String>> {
        Ok(self
            .alarms
            .iter()
            .filter(|(alarm_group, _)| alarm_group == group)
            .map(|(_, alarm)| alarm.clone())
            .collect())
    }

    async fn delete_alarms(&self, names: &[String]) -> CloudResult<()> {
        self.record("delete_alarms")
            .deleted_alarms
            .extend(names.iter().cloned());
        Ok(())
    }
}

impl OrchestrationApi for MockProvider {
    async fn list_runs(&self, _engine: &str) -> CloudResult<Vec<RunSummary>> {
        Ok(self.runs.clone())
    }

    async fn describe_run(&self, _run_id: &str) -> CloudResult<RunStatus> {
        let mut scripted = self.scripted_statuses.lock().unwrap();
        Ok(scripted.pop_front().unwrap_or(RunStatus::Succeeded))
    }
}

impl StorageApi for MockProvider {
    async fn put_object(&self, key: &str, body: &[u8]) -> CloudResult<()> {
        self.record("put_object")
            .written_objects
            .push((key.to_string(), body.to_vec()));
        Ok(())
    }
}
