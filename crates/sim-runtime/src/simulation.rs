//! The simulation orchestrator: owns the scheduler, every node, the
//! workload and propagation models, and drives one run to completion.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sim_behavior::{BehaviorParams, Effect, HonestBehavior, MaliciousBehavior, Node};
use sim_chain::Block;
use sim_config::{Config, ReportFlags};
use sim_scheduler::{Scheduler, StopReason};
use sim_types::{IdAllocator, NodeId, SimTime, TxId};
use sim_workload::{ConflictInjector, NetworkParams, PropagationModel, TransactionGenerator, WorkloadParams};
use tracing::warn;

use crate::error::{AssertionError, EventError};
use crate::event::EventKind;
use crate::logs::SimulationLogs;
use crate::metrics::{AttackMetrics, AttackOutcome};

/// Seed offset applied per simulation replication, so two runs of the same
/// config with different `sim_id`s don't draw identical random streams.
fn seeded_rng(base_seed: u64, sim_id: u64) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add(sim_id))
}

fn build_nodes(config: &Config, ids: &mut IdAllocator, base_seed: u64) -> Vec<Node> {
    let total = config.num_honest_nodes + config.num_malicious_nodes;
    let mut hash_power_rng = StdRng::seed_from_u64(base_seed ^ 0xA5A5_A5A5);
    let dist = rand_distr::Normal::new(config.hash_power_mean, config.hash_power_sd.max(0.0))
        .expect("hashpower distribution parameters must be finite");

    (0..total)
        .map(|i| {
            use rand_distr::Distribution;
            let id = ids.next_node_id();
            let hash_power = dist.sample(&mut hash_power_rng).max(1e-9);
            let behavior: Box<dyn sim_behavior::Behavior> = if i < config.num_honest_nodes {
                Box::new(HonestBehavior)
            } else {
                Box::new(MaliciousBehavior::new(
                    TxId(config.target_transaction.expect(
                        "Config guarantees workload.targetTransaction when malicious nodes are configured",
                    )),
                    config.required_confirmations.expect(
                        "Config guarantees attack.requiredConfirmations when malicious nodes are configured",
                    ),
                    config.min_chain_length,
                    config.max_chain_length,
                ))
            };
            Node::new(id, hash_power, config.pow_difficulty, config.min_value_to_mine, behavior, base_seed ^ id.0)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub sim_id: u64,
    pub stop_reason: StopReason,
    pub final_heights: Vec<u64>,
    pub attack_outcome: AttackOutcome,
    pub confirmations_at_attack_start: Option<u64>,
    pub target_tx_on_longest_path: Option<bool>,
    pub logs: SimulationLogs,
}

pub struct Simulation {
    sim_id: u64,
    scheduler: Scheduler<EventKind>,
    nodes: Vec<Node>,
    ids: IdAllocator,
    max_block_size: u64,
    tx_generator: TransactionGenerator,
    conflict_injector: ConflictInjector,
    has_conflicts: bool,
    propagation: PropagationModel,
    remaining_arrivals: u64,
    arrivals_dispatched: u64,
    terminate_at: SimTime,
    report: ReportFlags,
    target_tx_id: Option<TxId>,
    metrics: AttackMetrics,
    rng: StdRng,
    logs: SimulationLogs,
    fatal: Option<AssertionError>,
}

impl Simulation {
    pub fn new(config: &Config, sim_id: u64, base_seed: u64) -> Self {
        let mut ids = IdAllocator::new();
        let nodes = build_nodes(config, &mut ids, base_seed);

        let mut scheduler = Scheduler::new();
        for change in &config.hash_power_changes {
            scheduler.schedule(
                SimTime(change.time as f64),
                EventKind::HashPowerChange { node: NodeId(change.node_id), new_power: change.new_power },
            );
        }
        scheduler.schedule(SimTime::ZERO, EventKind::TxArrival);

        Simulation {
            sim_id,
            scheduler,
            nodes,
            ids,
            max_block_size: config.max_block_size,
            tx_generator: TransactionGenerator::new(WorkloadParams {
                lambda: config.workload_lambda,
                num_transactions: config.num_transactions,
                size_mean: config.tx_size_mean,
                size_sd: config.tx_size_sd,
                fee_value_mean: config.tx_fee_value_mean,
                fee_value_sd: config.tx_fee_value_sd,
            }),
            conflict_injector: ConflictInjector::new(
                config.conflict_likelihood,
                config.conflict_dispersion,
                config.target_transaction.map(TxId),
            ),
            has_conflicts: config.has_conflicts,
            propagation: PropagationModel::new(NetworkParams {
                throughput_mean: config.throughput_mean,
                throughput_sd: config.throughput_sd,
                propagation_time: config.propagation_time,
            }),
            remaining_arrivals: config.num_transactions,
            arrivals_dispatched: 0,
            terminate_at: SimTime(config.terminate_at_time),
            report: config.report,
            target_tx_id: config.target_transaction.map(TxId),
            metrics: AttackMetrics::default(),
            rng: seeded_rng(base_seed, sim_id),
            logs: SimulationLogs::default(),
            fatal: None,
        }
    }

    pub fn run(mut self) -> Result<SimulationOutcome, AssertionError> {
        let stop_reason = loop {
            let mut scheduler = std::mem::replace(&mut self.scheduler, Scheduler::new());
            let reason = scheduler.run_until(self.terminate_at, Some(1), |s, payload, now| {
                self.dispatch(s, payload, now);
            });
            self.scheduler = scheduler;

            if let Some(err) = self.fatal.take() {
                return Err(err);
            }
            if !matches!(reason, StopReason::MaxEventsReached) {
                break reason;
            }
        };

        let final_heights = self.nodes.iter().map(|n| n.structure.height()).collect();
        let target_tx_on_longest_path = self
            .target_tx_id
            .map(|tx_id| self.nodes.iter().any(|n| n.structure.longest_path_contains_tx(tx_id)));

        Ok(SimulationOutcome {
            sim_id: self.sim_id,
            stop_reason,
            final_heights,
            attack_outcome: self.metrics.outcome(),
            confirmations_at_attack_start: self.metrics.confirmations_at_start(),
            target_tx_on_longest_path,
            logs: self.logs,
        })
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn peer_ids(&self, source: NodeId) -> Vec<NodeId> {
        (0..self.nodes.len() as u64).map(NodeId).filter(|id| *id != source).collect()
    }

    fn log_error(&mut self, now: SimTime, kind: impl Into<String>, message: impl Into<String>) {
        let kind = kind.into();
        let message = message.into();
        warn!(kind = %kind, %message, "simulation event error");
        self.logs.errors.push(sim_report::ErrorLogRow::new(self.sim_id, now.as_f64(), kind, message));
    }

    fn log_unknown_node(&mut self, now: SimTime, node_id: NodeId) {
        let error = EventError::UnknownNode { node_id };
        self.log_error(now, "EventError::UnknownNode", error.to_string());
    }

    fn dispatch(&mut self, scheduler: &mut Scheduler<EventKind>, payload: EventKind, now: SimTime) {
        if self.fatal.is_some() {
            return;
        }
        let params = BehaviorParams { max_block_size: self.max_block_size, now };
        match payload {
            EventKind::TxArrival => self.handle_tx_arrival(scheduler, now, params),
            EventKind::TxPropagation { target, tx } => {
                let effects = self.node_mut(target).dispatch_propagated_tx(tx, params);
                self.apply_effects(scheduler, target, now, effects);
            }
            EventKind::ContainerPropagation { target, block } => {
                let effects = self.node_mut(target).dispatch_propagated_container(block, params);
                self.apply_effects(scheduler, target, now, effects);
            }
            EventKind::ValidationComplete { node } => self.handle_validation_complete(scheduler, node, now, params),
            EventKind::HashPowerChange { node, new_power } => self.handle_hashpower_change(now, node, new_power),
            EventKind::BehaviorChange { node, kind } => {
                if node.0 as usize >= self.nodes.len() {
                    self.log_unknown_node(now, node);
                    return;
                }
                let effects = sim_behavior::apply_behavior_change(self.node_mut(node), kind, params);
                self.apply_effects(scheduler, node, now, effects);
            }
        }
    }

    fn handle_tx_arrival(&mut self, scheduler: &mut Scheduler<EventKind>, now: SimTime, params: BehaviorParams) {
        if self.remaining_arrivals == 0 {
            return;
        }
        self.remaining_arrivals -= 1;

        let mut tx = self.tx_generator.sample_transaction(&mut self.rng, &mut self.ids);
        if self.has_conflicts {
            tx.conflict_peer_id = self.conflict_injector.choose_conflict(&mut self.rng);
        }
        self.conflict_injector.record(tx.id);

        let target = NodeId(self.arrivals_dispatched % self.nodes.len() as u64);
        self.arrivals_dispatched += 1;

        let effects = self.node_mut(target).dispatch_client_tx(tx, params);
        self.apply_effects(scheduler, target, now, effects);

        if self.remaining_arrivals > 0 {
            let gap = self.tx_generator.sample_interarrival(&mut self.rng);
            scheduler.schedule(now + gap, EventKind::TxArrival);
        }
    }

    fn handle_validation_complete(
        &mut self,
        scheduler: &mut Scheduler<EventKind>,
        node_id: NodeId,
        now: SimTime,
        params: BehaviorParams,
    ) {
        if node_id.0 as usize >= self.nodes.len() {
            self.log_unknown_node(now, node_id);
            return;
        }

        let node = &mut self.nodes[node_id.0 as usize];
        let duration = match node.mining.complete_mining(now) {
            Ok(duration) => duration,
            Err(source) => {
                self.fatal = Some(AssertionError::Mining { node_id, source });
                return;
            }
        };
        let cycles = node.hash_power * duration;
        let block_id = self.ids.next_block_id();
        let transactions = node.mining_pool.clone();
        let block = Block::candidate(block_id, transactions, node_id, now, node.operating_difficulty, cycles);

        let effects = self.node_mut(node_id).dispatch_validation_complete(block, params);
        self.apply_effects(scheduler, node_id, now, effects);
    }

    fn handle_hashpower_change(&mut self, now: SimTime, node: NodeId, new_power: f64) {
        if node.0 as usize >= self.nodes.len() {
            self.log_unknown_node(now, node);
            return;
        }
        sim_behavior::apply_hashpower_change(self.node_mut(node), new_power);
    }

    fn apply_effects(
        &mut self,
        scheduler: &mut Scheduler<EventKind>,
        source: NodeId,
        now: SimTime,
        effects: Vec<Effect>,
    ) {
        for effect in effects {
            match effect {
                Effect::PropagateTx(tx) => {
                    if self.report.events {
                        self.logs.events.push(sim_report::EventLogRow::new(
                            self.sim_id,
                            now.as_f64(),
                            Some(source),
                            "PropagateTx",
                            format!("tx {} to peers", tx.id),
                        ));
                    }
                    for peer in self.peer_ids(source) {
                        let throughput = self.propagation.sample_throughput(&mut self.rng);
                        let delay = self.propagation.delay_for(tx.size, throughput);
                        scheduler.schedule(now + delay, EventKind::TxPropagation { target: peer, tx: tx.clone() });
                    }
                }
                Effect::PropagateBlock(block) => {
                    if self.report.block_events {
                        self.logs.blocks.push(sim_report::BlockLogRow::new(self.sim_id, now.as_f64(), source, &block));
                    }
                    if self.report.structure_events {
                        self.logs.structure.push(sim_report::StructureLogRow::new(
                            self.sim_id,
                            now.as_f64(),
                            source,
                            &block,
                            "Attached",
                        ));
                    }
                    let size = block.transactions.total_size().max(1);
                    for peer in self.peer_ids(source) {
                        let throughput = self.propagation.sample_throughput(&mut self.rng);
                        let delay = self.propagation.delay_for(size, throughput);
                        scheduler.schedule(now + delay, EventKind::ContainerPropagation { target: peer, block: block.clone() });
                    }
                }
                Effect::BeginMining { fire_time } => {
                    let handle = scheduler.schedule(fire_time, EventKind::ValidationComplete { node: source });
                    self.node_mut(source).begin_mining(handle, now);
                }
                Effect::Discarded { reason } => {
                    if self.report.events {
                        self.logs.events.push(sim_report::EventLogRow::new(
                            self.sim_id,
                            now.as_f64(),
                            Some(source),
                            "Discarded",
                            reason,
                        ));
                    }
                }
                Effect::AttackState { tx_id, state, block_id, block_height, hidden_chain_len, public_growth, outcome } => {
                    if state == "Attacking" && outcome == "started" {
                        let tip_height = self.node_mut(source).structure.height();
                        let confirmations = block_height.map(|h| tip_height.saturating_sub(h));
                        self.metrics.record_attack_started(confirmations);
                    }
                    if state == "Idle" && outcome == "revealed" {
                        self.metrics.record_attack_revealed();
                    }
                    if self.report.attack_events {
                        self.logs.attacks.push(sim_report::AttackLogRow::new(
                            self.sim_id,
                            now.as_f64(),
                            source,
                            state,
                            tx_id,
                            block_id,
                            block_height,
                            hidden_chain_len,
                            public_growth,
                            outcome,
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config_map() -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("sim.terminate.atTime".into(), "5000".into());
        map.insert("net.numOfHonestNodes".into(), "3".into());
        map.insert("workload.lambda".into(), "5.0".into());
        map.insert("workload.numTransactions".into(), "20".into());
        map.insert("pow.difficulty".into(), "1000.0".into());
        map.insert("pow.hashPowerMean".into(), "50.0".into());
        map.insert("bitcoin.maxBlockSize".into(), "100000".into());
        map.insert("bitcoin.minValueToMine".into(), "0.0".into());
        map.insert("net.throughputMean".into(), "1000.0".into());
        map.insert("net.propagationTime".into(), "0.05".into());
        map
    }

    #[test]
    fn a_basic_honest_only_run_terminates_and_grows_the_chain() {
        let config = Config::from_map(&config_map()).unwrap();
        let sim = Simulation::new(&config, 1, 42);
        let outcome = sim.run().unwrap();
        assert_eq!(outcome.stop_reason, StopReason::MaxTimeReached);
        assert!(outcome.final_heights.iter().any(|h| *h > 0));
        assert_eq!(outcome.attack_outcome, AttackOutcome::NeverStarted);
    }

    #[test]
    fn hashpower_change_targeting_an_unknown_node_is_logged_not_fatal() {
        let mut map = config_map();
        map.insert("node.hashPowerChanges".into(), "{99:1.0E10:10}".into());
        let config = Config::from_map(&map).unwrap();
        let sim = Simulation::new(&config, 1, 42);
        let outcome = sim.run().unwrap();
        assert!(outcome.logs.errors.iter().any(|e| e.error_kind == "EventError::UnknownNode"));
    }

    #[test]
    fn malicious_node_can_complete_an_attack_run() {
        let mut map = config_map();
        map.insert("net.numOfMaliciousNodes".into(), "1".into());
        map.insert("attack.requiredConfirmations".into(), "1".into());
        map.insert("workload.targetTransaction".into(), "0".into());
        map.insert("pow.hashPowerMean".into(), "5000.0".into());
        map.insert("sim.terminate.atTime".into(), "2000".into());

        let config = Config::from_map(&map).unwrap();
        let sim = Simulation::new(&config, 7, 99);
        let outcome = sim.run().unwrap();
        assert!(matches!(outcome.stop_reason, StopReason::MaxTimeReached | StopReason::QueueEmpty));
    }
}
